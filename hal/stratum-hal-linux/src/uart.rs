//! Serial device for the motion board

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use stratum_hal::{DataBits, FlowControl, Parity, PortControl, StopBits, UartConfig, UartRx, UartTx};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors from the serial device
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial port is closed")]
    NotOpen,
    #[error("serial I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// A serial device that can be released and reacquired by path
pub struct SerialDevice {
    path: String,
    config: UartConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialDevice {
    /// Describe the device; nothing is opened yet
    pub fn new(path: impl Into<String>, config: UartConfig) -> Self {
        Self {
            path: path.into(),
            config,
            port: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, SerialError> {
        self.port.as_mut().ok_or(SerialError::NotOpen)
    }
}

impl PortControl for SerialDevice {
    type Error = SerialError;

    fn open(&mut self) -> Result<(), SerialError> {
        if self.port.is_some() {
            return Ok(());
        }
        let cfg = &self.config;
        let port = serialport::new(self.path.as_str(), cfg.baudrate)
            .timeout(Duration::from_millis(u64::from(cfg.timeout_ms)))
            .data_bits(match cfg.data_bits {
                DataBits::Five => serialport::DataBits::Five,
                DataBits::Six => serialport::DataBits::Six,
                DataBits::Seven => serialport::DataBits::Seven,
                DataBits::Eight => serialport::DataBits::Eight,
            })
            .parity(match cfg.parity {
                Parity::None => serialport::Parity::None,
                Parity::Even => serialport::Parity::Even,
                Parity::Odd => serialport::Parity::Odd,
            })
            .stop_bits(match cfg.stop_bits {
                StopBits::One => serialport::StopBits::One,
                StopBits::Two => serialport::StopBits::Two,
            })
            .flow_control(match cfg.flow_control {
                FlowControl::None => serialport::FlowControl::None,
                FlowControl::Software => serialport::FlowControl::Software,
                FlowControl::Hardware => serialport::FlowControl::Hardware,
            })
            .open()
            .map_err(|source| {
                warn!(path = %self.path, %source, "serial open failed");
                SerialError::Open {
                    path: self.path.clone(),
                    source,
                }
            })?;
        debug!(path = %self.path, baud = cfg.baudrate, "serial port opened");
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!(path = %self.path, "serial port closed");
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl UartTx for SerialDevice {
    type Error = SerialError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), SerialError> {
        trace!(bytes = data.len(), "serial write");
        self.port()?.write_all(data).map_err(|e| {
            warn!(error = %e, "serial write failed");
            SerialError::Io(e)
        })
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.port()?.flush()?;
        Ok(())
    }
}

impl UartRx for SerialDevice {
    type Error = SerialError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        match self.port()?.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(0),
            Err(e) => {
                warn!(error = %e, "serial read failed");
                Err(SerialError::Io(e))
            }
        }
    }
}
