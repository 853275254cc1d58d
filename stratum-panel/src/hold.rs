//! Cancellable waits for the print path

use core::future::Future;
use core::pin::pin;

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;
use stratum_core::traits::{Hold, HoldOutcome};
use stratum_display::DisplayBackend;

use crate::channels::CancelSignal;
use crate::shared::PanelShared;

/// Hold that wakes on the STOP signal
///
/// The signal only wakes the wait; the run's cancellation flag decides.
/// A wake with the flag clear resumes waiting for the rest of the time,
/// measured against the monotonic clock.
pub struct SignalHold<'a, B, D> {
    shared: &'a PanelShared<B>,
    cancel: &'a CancelSignal,
    delay: D,
}

impl<'a, B: DisplayBackend, D: DelayNs> SignalHold<'a, B, D> {
    pub fn new(shared: &'a PanelShared<B>, cancel: &'a CancelSignal, delay: D) -> Self {
        Self {
            shared,
            cancel,
            delay,
        }
    }
}

impl<B: DisplayBackend, D: DelayNs> Hold for SignalHold<'_, B, D> {
    async fn hold(&mut self, ms: u64) -> HoldOutcome {
        let deadline = Instant::now() + Duration::from_millis(ms);

        loop {
            if self.shared.is_cancelled() {
                return HoldOutcome::Cancelled;
            }
            let remaining_us = deadline.saturating_duration_since(Instant::now()).as_micros();
            if remaining_us == 0 {
                return HoldOutcome::Elapsed;
            }
            let step_us = u32::try_from(remaining_us).unwrap_or(u32::MAX);
            // Either way round the loop re-reads the flag and the clock
            let _ = select(self.delay.delay_us(step_us), self.cancel.wait()).await;
        }
    }

    async fn guard<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        let mut fut = pin!(fut);

        loop {
            if self.shared.is_cancelled() {
                return None;
            }
            match select(fut.as_mut(), self.cancel.wait()).await {
                Either::First(output) => return Some(output),
                Either::Second(()) => continue,
            }
        }
    }
}
