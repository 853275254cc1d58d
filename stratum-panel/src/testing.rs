//! Recording fakes shared by the unit tests
//!
//! Port, delay, projector and hold all append to one log so a test can
//! assert on the interleaving of link traffic, frames and waits.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use stratum_core::traits::{Hold, HoldOutcome, Projector};
use stratum_hal::{PortControl, UartRx, UartTx};

use crate::shared::tests::NullBackend;
use crate::shared::PanelShared;

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Only the commands written to the port
    pub fn sent(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("tx ").map(str::to_string))
            .collect()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Serial port that logs opens, closes and written lines
pub struct LogPort {
    log: Log,
    open: bool,
    /// Replies handed out one per read once the port is open
    pub replies: Vec<Vec<u8>>,
}

impl LogPort {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            open: false,
            replies: Vec::new(),
        }
    }
}

impl UartTx for LogPort {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        let text = std::str::from_utf8(data).map_err(|_| ())?;
        for line in text.lines().filter(|l| !l.is_empty()) {
            self.log.push(format!("tx {line}"));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

impl UartRx for LogPort {
    type Error = ();

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        if self.replies.is_empty() {
            return Ok(0);
        }
        let chunk = self.replies.remove(0);
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl PortControl for LogPort {
    type Error = ();

    fn open(&mut self) -> Result<(), ()> {
        self.open = true;
        self.log.push("open");
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
        self.log.push("close");
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Delay that returns immediately and logs the requested time
pub struct LogDelay(pub Log);

impl DelayNs for LogDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.push(format!("delay {}", ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.push(format!("delay {ms}"));
    }
}

pub struct LogProjector(pub Log);

impl Projector for LogProjector {
    type Image = usize;

    fn show(&mut self, image: &usize) {
        self.0.push(format!("show {image}"));
    }

    fn hide(&mut self) {
        self.0.push("hide");
    }
}

/// Hold that never sleeps; it can cancel the run on its n-th call
pub struct LogHold<'a> {
    log: Log,
    shared: &'a PanelShared<NullBackend>,
    calls: usize,
    cancel_on: Option<usize>,
}

impl<'a> LogHold<'a> {
    pub fn new(log: &Log, shared: &'a PanelShared<NullBackend>) -> Self {
        Self {
            log: log.clone(),
            shared,
            calls: 0,
            cancel_on: None,
        }
    }

    /// Cancel the run when the `n`-th hold (1-based) starts
    pub fn cancel_on(mut self, n: usize) -> Self {
        self.cancel_on = Some(n);
        self
    }
}

impl Hold for LogHold<'_> {
    async fn hold(&mut self, ms: u64) -> HoldOutcome {
        self.calls += 1;
        self.log.push(format!("hold {ms}"));
        if self.cancel_on == Some(self.calls) {
            self.shared.cancel_run();
        }
        if self.shared.is_cancelled() {
            HoldOutcome::Cancelled
        } else {
            HoldOutcome::Elapsed
        }
    }

    async fn guard<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        if self.shared.is_cancelled() {
            return None;
        }
        Some(fut.await)
    }
}
