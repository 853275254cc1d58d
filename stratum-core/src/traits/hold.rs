//! Cancellable waits

use core::future::Future;

/// How a hold ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldOutcome {
    /// The full duration elapsed
    Elapsed,
    /// Cancellation was signalled first
    Cancelled,
}

impl HoldOutcome {
    pub fn is_cancelled(self) -> bool {
        self == HoldOutcome::Cancelled
    }
}

/// A wait that ends early when the active run is cancelled
#[allow(async_fn_in_trait)]
pub trait Hold {
    /// Wait `ms` milliseconds unless cancelled first
    async fn hold(&mut self, ms: u64) -> HoldOutcome;

    /// Drive `fut` to completion unless cancelled first
    ///
    /// Returns `None` when cancellation won; `fut` is dropped at that
    /// point.
    async fn guard<F: Future>(&mut self, fut: F) -> Option<F::Output>;
}
