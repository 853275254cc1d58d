//! Serial port abstractions
//!
//! The motion board is reached over a USB serial adapter. Besides plain
//! reads and writes the controller needs to release and reacquire the
//! port: the board firmware resets its command state when the port is
//! reopened, which is how a stop or jog clears anything still queued.

/// Serial transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write all of `data`, blocking until it has been handed to the OS
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever is available into `buf`
    ///
    /// Returns `Ok(0)` when the read timeout elapses with no data.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Open/close control over the underlying port
pub trait PortControl {
    /// Error type for open operations
    type Error;

    /// Acquire the port. Opening an already open port is a no-op.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Release the port. Closing a closed port is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// A full serial port: transmit, receive and open/close
pub trait Uart: UartTx + UartRx + PortControl {}

impl<T: UartTx + UartRx + PortControl> Uart for T {}

/// Serial line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout_ms: 1_000,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Flow control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}
