//! Print-path step execution
//!
//! Drives a [`PrintScheduler`] and performs each step against the link,
//! the projector and the status display. Every link burst locks the link,
//! re-checks the run's cancellation flag under the lock, writes, and
//! closes the port again before releasing it.

use embedded_hal_async::delay::DelayNs;
use stratum_core::config::ExposureConfig;
use stratum_core::job::Job;
use stratum_core::link::{LinkError, MotionLink};
use stratum_core::scheduler::{PrintScheduler, PrintStep, RunOutcome};
use stratum_core::status::StatusMessage;
use stratum_core::traits::{Hold, Projector};
use stratum_display::DisplayBackend;
use stratum_hal::Uart;
use stratum_protocol::{MotionCommand, MotionSequence};
use tracing::{debug, info, warn};

use crate::channels::SharedLink;
use crate::config::TimingConfig;
use crate::shared::PanelShared;

/// Executes one run at a time
pub struct PrintRunner<'a, P, B, J, H, D> {
    link: &'a SharedLink<P>,
    shared: &'a PanelShared<B>,
    projector: J,
    hold: H,
    delay: D,
    timing: TimingConfig,
}

impl<'a, P, B, J, H, D> PrintRunner<'a, P, B, J, H, D>
where
    P: Uart,
    B: DisplayBackend,
    J: Projector,
    H: Hold,
    D: DelayNs,
{
    pub fn new(
        link: &'a SharedLink<P>,
        shared: &'a PanelShared<B>,
        projector: J,
        hold: H,
        delay: D,
        timing: TimingConfig,
    ) -> Self {
        Self {
            link,
            shared,
            projector,
            hold,
            delay,
            timing,
        }
    }

    pub fn projector_mut(&mut self) -> &mut J {
        &mut self.projector
    }

    /// Print `job` to completion or cancellation
    pub async fn run(&mut self, job: &Job<J::Image>, exposure: ExposureConfig) -> RunOutcome {
        let mut scheduler =
            PrintScheduler::new(exposure, job.layer_count(), job.layer_thickness_mm());
        let mut outcome = RunOutcome::Cancelled;

        while let Some(step) = scheduler.next(self.shared.is_cancelled()) {
            match step {
                PrintStep::Begin {
                    layer_count,
                    thickness_mm,
                } => self.begin(layer_count, thickness_mm).await,
                PrintStep::Publish(progress) => {
                    self.shared.show_progress(&progress);
                    self.shared.advance_run(progress.index);
                }
                PrintStep::Expose { index, hold_ms } => self.expose(job, index, hold_ms).await,
                PrintStep::Rise {
                    index,
                    overshoot_mm,
                    length_mm,
                } => self.rise(index, overshoot_mm, length_mm).await,
                PrintStep::Pause { pause_ms, .. } => {
                    self.hold.hold(pause_ms).await;
                }
                PrintStep::Finish(result) => {
                    self.finish(result).await;
                    outcome = result;
                }
            }
        }

        outcome
    }

    async fn begin(&mut self, layer_count: usize, thickness_mm: f64) {
        info!(layer_count, thickness_mm, "print started");
        self.shared.set_lines(
            "Printing...",
            &format!("H:{thickness_mm:.3} N:{layer_count}"),
        );

        let link = self.link;
        let mut link = link.lock().await;
        if let Err(e) = link.reset_cycle() {
            warn!(error = %e, "link reset failed");
        }
        if let Err(e) = link.send_sequence(MotionSequence::Home) {
            warn!(error = %e, "home sequence failed");
        }

        let ready = link.wait_ready(
            &mut self.delay,
            self.timing.ready_timeout_ms,
            self.timing.probe_interval_ms,
        );
        match self.hold.guard(ready).await {
            Some(Ok(())) => debug!("motion board ready"),
            Some(Err(e)) => warn!(error = %e, "motion board not ready, printing anyway"),
            None => debug!("stopped while waiting for the motion board"),
        }
        link.close();
    }

    async fn expose(&mut self, job: &Job<J::Image>, index: usize, hold_ms: u64) {
        let Some(layer) = job.layer(index) else {
            warn!(index, "layer missing from job");
            return;
        };

        debug!(index, z_mm = layer.z_mm, hold_ms, "exposing layer");
        self.projector.show(&layer.image);
        if index == 0 {
            self.burst(|link| link.send(&MotionCommand::ShutterOpen))
                .await;
        }
        self.hold.hold(hold_ms).await;
        self.projector.hide();
    }

    async fn rise(&mut self, index: usize, overshoot_mm: f64, length_mm: f64) {
        {
            let mut link = self.link.lock().await;
            if self.shared.is_cancelled() {
                return;
            }
            if let Err(e) = link.reopen() {
                warn!(error = %e, "link reopen failed");
            }
        }

        if self.hold.hold(self.timing.rise_settle_ms).await.is_cancelled() {
            return;
        }

        debug!(index, overshoot_mm, length_mm, "peel");
        let peel = MotionCommand::Peel {
            overshoot_mm,
            length_mm,
        };
        self.burst(|link| {
            link.send(&MotionCommand::Relative)?;
            link.send(&peel)?;
            link.send(&MotionCommand::Absolute)
        })
        .await;
    }

    async fn finish(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Completed => {
                self.burst(|link| {
                    link.send_sequence(MotionSequence::Park)?;
                    link.send(&MotionCommand::ShutterClose)
                })
                .await;
                self.projector.hide();
                self.shared.show(StatusMessage::PrintFinished);
            }
            // STOP has already raised the platform; only the shutter is left
            RunOutcome::Cancelled => {
                self.burst_unchecked(|link| link.send(&MotionCommand::ShutterClose))
                    .await;
                self.projector.hide();
            }
            RunOutcome::Empty => {
                self.projector.hide();
                self.shared.show(StatusMessage::PrintFinished);
            }
        }
        info!(?outcome, "print ended");
    }

    /// Write and close; skipped if the run was cancelled
    ///
    /// Opens the port first unless a preceding step left it open.
    async fn burst<F>(&mut self, write: F)
    where
        F: FnOnce(&mut MotionLink<P>) -> Result<(), LinkError>,
    {
        let mut link = self.link.lock().await;
        if self.shared.is_cancelled() {
            debug!("link burst skipped, run cancelled");
            link.close();
            return;
        }
        send_burst(&mut link, write);
    }

    async fn burst_unchecked<F>(&mut self, write: F)
    where
        F: FnOnce(&mut MotionLink<P>) -> Result<(), LinkError>,
    {
        let mut link = self.link.lock().await;
        send_burst(&mut link, write);
    }
}

fn send_burst<P: Uart>(
    link: &mut MotionLink<P>,
    write: impl FnOnce(&mut MotionLink<P>) -> Result<(), LinkError>,
) {
    if let Err(e) = link.open().and_then(|()| write(link)) {
        warn!(error = %e, "link write failed");
    }
    link.close();
}
