//! Button polling task
//!
//! Samples the pins every poll interval, waits the settle delay after an
//! edge and re-reads before a press is forwarded to the controller.

use embassy_time::{Duration, Instant, Ticker, Timer};
use stratum_hal::InputPin;
use tracing::{debug, info, trace};

use crate::buttons::ButtonScanner;
use crate::channels::BUTTON_CHANNEL;
use crate::config::TimingConfig;

/// Button task - forwards debounced presses
pub async fn buttons_task<I: InputPin>(mut scanner: ButtonScanner<I>, timing: TimingConfig) {
    info!("Button task started");

    let mut ticker = Ticker::every(Duration::from_millis(timing.button_poll_ms));
    let start = Instant::now();

    loop {
        ticker.next().await;

        for button in scanner.scan() {
            Timer::after_millis(timing.settle_read_ms).await;

            let now_ms = start.elapsed().as_millis();
            if scanner.confirm(button, now_ms) {
                debug!(button = button.name(), "button pressed");
                BUTTON_CHANNEL.send(button).await;
            } else {
                trace!(button = button.name(), "edge rejected");
            }
        }
    }
}
