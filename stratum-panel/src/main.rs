//! Stratum - resin printer panel controller
//!
//! Daemon for the control panel of a DLP/SLA resin printer on a
//! Raspberry Pi. Four buttons drive a small state machine; START loads
//! the newest sliced job from a USB stick and prints it layer by layer,
//! projecting each slice and peeling the build plate through the motion
//! board on a serial link.
//!
//! Three loops share one embassy executor thread: button polling, the
//! state machine controller, and the print runner.

mod buttons;
mod channels;
mod config;
mod console;
mod controller;
mod hold;
mod media;
mod projector;
mod runner;
mod shared;
mod tasks;

#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use embassy_executor::Spawner;
use embassy_futures::join::join3;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use rppal::gpio::Gpio;
use stratum_core::link::MotionLink;
use stratum_core::status::StatusMessage;
use stratum_hal::ActiveLevel;
use stratum_hal_linux::{GpioAllocator, GpioError, PanelPin, SerialDevice};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::buttons::ButtonScanner;
use crate::channels::{SharedLink, CANCEL, PRINT_REQUEST};
use crate::config::{load_config, PinConfig};
use crate::console::ConsoleBackend;
use crate::controller::PanelController;
use crate::hold::SignalHold;
use crate::media::MediaJobSource;
use crate::projector::FrameFileProjector;
use crate::runner::PrintRunner;
use crate::shared::PanelShared;

#[derive(Parser, Debug)]
#[command(name = "stratum-panel", version, about = "Resin printer panel controller")]
struct Args {
    /// Configuration file; the built-in defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter such as `debug` or `stratum_panel=trace` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Claim the four button pins in `Button::ALL` order
fn open_buttons(gpio: &Gpio, pins: &PinConfig) -> Result<[PanelPin; 4], GpioError> {
    let mut allocator = GpioAllocator::new();
    let [start, stop, up, down] = pins.in_scan_order();
    Ok([
        PanelPin::open(gpio, &mut allocator, start)?,
        PanelPin::open(gpio, &mut allocator, stop)?,
        PanelPin::open(gpio, &mut allocator, up)?,
        PanelPin::open(gpio, &mut allocator, down)?,
    ])
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let args = Args::parse();
    init_logging(args.log.as_deref());
    info!("Stratum panel starting...");

    let config = load_config(args.config.as_deref());
    info!(
        serial = %config.serial.path,
        baudrate = config.serial.baudrate,
        media = %config.media.mount_dir.display(),
        frame = %config.projector.frame_path.display(),
        "configuration loaded"
    );

    let pins = match Gpio::new()
        .map_err(GpioError::from)
        .and_then(|gpio| open_buttons(&gpio, &config.pins))
    {
        Ok(pins) => pins,
        Err(e) => {
            error!(error = %e, "cannot open button inputs");
            process::exit(1);
        }
    };

    let port = SerialDevice::new(config.serial.path.clone(), config.serial.uart_config());
    let link: Box<SharedLink<SerialDevice>> = Box::new(Mutex::new(MotionLink::new(port)));
    let shared = Box::new(PanelShared::new(ConsoleBackend::new()));
    shared.show(StatusMessage::Welcome);

    let scanner = ButtonScanner::new(pins, ActiveLevel::Low, config.timing.debounce_ms);
    let controller = PanelController::new(
        &link,
        &shared,
        &PRINT_REQUEST,
        &CANCEL,
        Delay,
        config.timing.jog_settle_ms,
    );
    let runner = PrintRunner::new(
        &link,
        &shared,
        FrameFileProjector::new(config.projector.frame_path.clone(), config.geometry),
        SignalHold::new(&shared, &CANCEL, Delay),
        Delay,
        config.timing,
    );
    let source = MediaJobSource::new(config.media.clone());

    info!("Panel ready");
    Box::pin(join3(
        tasks::buttons_task(scanner, config.timing),
        tasks::controller_task(controller),
        tasks::print_task(runner, &shared, source, config.base_settings()),
    ))
    .await;
}
