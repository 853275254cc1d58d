//! Controller task
//!
//! Serialises button presses and print-task events into the state
//! machine, one event at a time.

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use stratum_core::state::Event;
use stratum_display::DisplayBackend;
use stratum_hal::Uart;
use tracing::{debug, info};

use crate::channels::{BUTTON_CHANNEL, EVENT_CHANNEL};
use crate::controller::PanelController;

/// Controller task - main coordination loop
pub async fn controller_task<P: Uart, B: DisplayBackend, D: DelayNs>(
    mut controller: PanelController<'_, P, B, D>,
) {
    info!("Controller task started");

    loop {
        let event = match select(BUTTON_CHANNEL.receive(), EVENT_CHANNEL.receive()).await {
            Either::First(button) => Event::Pressed(button),
            Either::Second(event) => event,
        };

        let state = controller.handle(event).await;
        debug!(?state, "event handled");
    }
}
