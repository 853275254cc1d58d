//! Print task
//!
//! Waits for START, loads the job from the media and runs it. The outcome
//! goes back to the controller as an event.

use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use stratum_core::config::PrinterSettings;
use stratum_core::state::Event;
use stratum_core::traits::{Hold, JobSource};
use stratum_display::DisplayBackend;
use stratum_hal::Uart;
use tracing::{debug, info, warn};

use crate::channels::{CANCEL, EVENT_CHANNEL, PRINT_REQUEST};
use crate::media::MediaJobSource;
use crate::projector::FrameFileProjector;
use crate::runner::PrintRunner;
use crate::shared::PanelShared;

/// Print task - one run per request
pub async fn print_task<P, B, H, D>(
    mut runner: PrintRunner<'_, P, B, FrameFileProjector, H, D>,
    shared: &PanelShared<B>,
    mut source: MediaJobSource,
    base: PrinterSettings,
) where
    P: Uart,
    B: DisplayBackend,
    H: Hold,
    D: DelayNs,
{
    info!("Print task started");

    loop {
        let id = PRINT_REQUEST.wait().await;
        CANCEL.reset();

        if !shared.begin_run(id, Instant::now().as_millis()) {
            debug!(run = id.raw(), "print request dropped, no longer current");
            continue;
        }

        let event = match source.acquire(base) {
            Ok((job, settings)) => {
                runner.projector_mut().set_geometry(settings.projector);
                Event::PrintEnded(id, runner.run(&job, settings.exposure).await)
            }
            Err(e) => {
                warn!(error = %e, "no printable job");
                Event::JobUnavailable(id)
            }
        };

        if let Some(run) = shared.end_run() {
            info!(
                run = run.id().raw(),
                layers_done = run.current_index(),
                elapsed_s = run.elapsed_ms(Instant::now().as_millis()) / 1000,
                "run closed"
            );
        }
        EVENT_CHANNEL.send(event).await;
    }
}
