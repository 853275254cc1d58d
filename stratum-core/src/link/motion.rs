use embedded_hal_async::delay::DelayNs;
use stratum_hal::Uart;
use stratum_protocol::{LineParser, MotionCommand, MotionSequence};

/// Errors from the motion link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// A write was attempted while the port is closed
    NotOpen,
    /// The board did not acknowledge in time
    Timeout,
    /// The port reported an I/O failure
    IoFailure,
    /// A command could not be encoded
    InvalidCommand,
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinkError::NotOpen => f.write_str("link not open"),
            LinkError::Timeout => f.write_str("motion board did not answer"),
            LinkError::IoFailure => f.write_str("serial I/O failure"),
            LinkError::InvalidCommand => f.write_str("command could not be encoded"),
        }
    }
}

/// Whether the port is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Closed,
    Open,
}

/// Serial link to the motion board
#[derive(Debug)]
pub struct MotionLink<P> {
    port: P,
    parser: LineParser,
}

impl<P: Uart> MotionLink<P> {
    /// Wrap a port; the link starts in whatever state the port is in
    pub fn new(port: P) -> Self {
        Self {
            port,
            parser: LineParser::new(),
        }
    }

    pub fn state(&self) -> LinkState {
        if self.port.is_open() {
            LinkState::Open
        } else {
            LinkState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.port.is_open()
    }

    /// Acquire the port; no-op if already open
    pub fn open(&mut self) -> Result<(), LinkError> {
        if self.port.is_open() {
            return Ok(());
        }
        self.parser.reset();
        self.port.open().map_err(|_| LinkError::IoFailure)
    }

    /// Flush and release the port; no-op if already closed
    pub fn close(&mut self) {
        if !self.port.is_open() {
            return;
        }
        // A failed flush still releases the port
        let _ = self.port.flush();
        self.port.close();
    }

    /// Close (if open) and open again
    pub fn reopen(&mut self) -> Result<(), LinkError> {
        self.close();
        self.open()
    }

    /// Close, open, close, open
    ///
    /// The board needs the port toggled twice before it accepts motion
    /// commands reliably after a stop or an earlier burst.
    pub fn reset_cycle(&mut self) -> Result<(), LinkError> {
        self.close();
        self.open()?;
        self.close();
        self.open()
    }

    /// Write a literal command followed by the newline terminator
    pub fn send_raw(&mut self, command: &str) -> Result<(), LinkError> {
        if !self.port.is_open() {
            return Err(LinkError::NotOpen);
        }
        self.port
            .write_blocking(command.as_bytes())
            .and_then(|_| self.port.write_blocking(b"\n"))
            .map_err(|_| LinkError::IoFailure)
    }

    /// Encode and write one command
    pub fn send(&mut self, command: &MotionCommand) -> Result<(), LinkError> {
        if !self.port.is_open() {
            return Err(LinkError::NotOpen);
        }
        let line = command.to_line().map_err(|_| LinkError::InvalidCommand)?;
        self.port
            .write_blocking(line.as_bytes())
            .map_err(|_| LinkError::IoFailure)
    }

    /// Write every command of a canned sequence, stopping at the first error
    pub fn send_sequence(&mut self, sequence: MotionSequence) -> Result<(), LinkError> {
        sequence
            .commands()
            .iter()
            .try_for_each(|command| self.send(command))
    }

    /// Probe the board until it acknowledges or `timeout_ms` elapses
    ///
    /// Sends the no-op probe every `poll_ms` and scans whatever came back
    /// for a line starting with `ok`. Only the calling task waits.
    pub async fn wait_ready<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_ms: u32,
        poll_ms: u32,
    ) -> Result<(), LinkError> {
        let poll_ms = poll_ms.max(1);
        let mut waited_ms = 0u32;
        let mut buf = [0u8; 64];

        loop {
            self.send(&MotionCommand::Probe)?;

            loop {
                let n = self
                    .port
                    .read_blocking(&mut buf)
                    .map_err(|_| LinkError::IoFailure)?;
                if n == 0 {
                    break;
                }
                if self.parser.count_acks(&buf[..n]) > 0 {
                    return Ok(());
                }
            }

            if waited_ms >= timeout_ms {
                return Err(LinkError::Timeout);
            }
            delay.delay_ms(poll_ms).await;
            waited_ms = waited_ms.saturating_add(poll_ms);
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec;
    use stratum_hal::{PortControl, UartRx, UartTx};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PortOp {
        Open,
        Close,
    }

    #[derive(Default)]
    struct MockPort {
        open: bool,
        ops: Vec<PortOp>,
        written: String,
        replies: VecDeque<Vec<u8>>,
        fail_writes: bool,
    }

    impl UartTx for MockPort {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail_writes {
                return Err(());
            }
            self.written.push_str(core::str::from_utf8(data).unwrap());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    impl UartRx for MockPort {
        type Error = ();

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            match self.replies.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    impl PortControl for MockPort {
        type Error = ();

        fn open(&mut self) -> Result<(), ()> {
            self.open = true;
            self.ops.push(PortOp::Open);
            Ok(())
        }

        fn close(&mut self) {
            self.open = false;
            self.ops.push(PortOp::Close);
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    struct CountingDelay {
        total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn test_send_requires_open() {
        let mut link = MotionLink::new(MockPort::default());
        assert_eq!(link.send(&MotionCommand::Home), Err(LinkError::NotOpen));
        assert_eq!(link.send_raw("G28"), Err(LinkError::NotOpen));
        assert!(link.port().written.is_empty());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut link = MotionLink::new(MockPort::default());
        link.open().unwrap();
        link.open().unwrap();
        assert_eq!(link.port().ops, [PortOp::Open]);
        assert_eq!(link.state(), LinkState::Open);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut link = MotionLink::new(MockPort::default());
        link.close();
        link.open().unwrap();
        link.close();
        link.close();
        assert_eq!(link.port().ops, [PortOp::Open, PortOp::Close]);
        assert_eq!(link.state(), LinkState::Closed);
    }

    #[test]
    fn test_reset_cycle_toggles_twice() {
        let mut link = MotionLink::new(MockPort::default());
        link.open().unwrap();
        link.reset_cycle().unwrap();
        assert_eq!(
            link.port().ops,
            [PortOp::Open, PortOp::Close, PortOp::Open, PortOp::Close, PortOp::Open]
        );
        assert!(link.is_open());
    }

    #[test]
    fn test_send_sequence() {
        let mut link = MotionLink::new(MockPort::default());
        link.open().unwrap();
        link.send_sequence(MotionSequence::Raise).unwrap();
        assert_eq!(link.port().written, "G90\nM210 Z160\nG0 Z400\n");
    }

    #[test]
    fn test_send_raw_appends_newline() {
        let mut link = MotionLink::new(MockPort::default());
        link.open().unwrap();
        link.send_raw("G93").unwrap();
        assert_eq!(link.port().written, "G93\n");
    }

    #[test]
    fn test_io_failure() {
        let mut link = MotionLink::new(MockPort {
            fail_writes: true,
            ..MockPort::default()
        });
        link.open().unwrap();
        assert_eq!(link.send(&MotionCommand::Home), Err(LinkError::IoFailure));
    }

    #[test]
    fn test_wait_ready_ack_split_across_reads() {
        let mut port = MockPort::default();
        port.replies.push_back(b"start\n".to_vec());
        port.replies.push_back(b"o".to_vec());
        port.replies.push_back(b"k\r\n".to_vec());
        let mut link = MotionLink::new(port);
        link.open().unwrap();
        let mut delay = CountingDelay { total_ms: 0 };
        assert_eq!(block_on(link.wait_ready(&mut delay, 50, 10)), Ok(()));
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn test_wait_ready_ack_on_later_poll() {
        let mut port = MockPort::default();
        port.replies.push_back(b"busy\n".to_vec());
        port.replies.push_back(Vec::new());
        port.replies.push_back(b"ok\n".to_vec());
        let mut link = MotionLink::new(port);
        link.open().unwrap();
        let mut delay = CountingDelay { total_ms: 0 };
        assert_eq!(block_on(link.wait_ready(&mut delay, 50, 10)), Ok(()));
        assert_eq!(delay.total_ms, 10);
        assert_eq!(link.port().written, "G0\nG0\n");
    }

    #[test]
    fn test_wait_ready_first_poll() {
        let mut port = MockPort::default();
        port.replies.push_back(b"ok\n".to_vec());
        let mut link = MotionLink::new(port);
        link.open().unwrap();
        let mut delay = CountingDelay { total_ms: 0 };
        assert_eq!(block_on(link.wait_ready(&mut delay, 1_000, 100)), Ok(()));
        assert_eq!(delay.total_ms, 0);
        assert_eq!(link.port().written, "G0\n");
    }

    #[test]
    fn test_wait_ready_times_out() {
        let mut link = MotionLink::new(MockPort::default());
        link.open().unwrap();
        let mut delay = CountingDelay { total_ms: 0 };
        assert_eq!(
            block_on(link.wait_ready(&mut delay, 300, 100)),
            Err(LinkError::Timeout)
        );
        assert_eq!(delay.total_ms, 300);
        assert_eq!(link.port().written, "G0\nG0\nG0\nG0\n");
    }

    #[test]
    fn test_wait_ready_closed_link() {
        let mut link = MotionLink::new(MockPort::default());
        let mut delay = CountingDelay { total_ms: 0 };
        assert_eq!(
            block_on(link.wait_ready(&mut delay, 300, 100)),
            Err(LinkError::NotOpen)
        );
    }
}
