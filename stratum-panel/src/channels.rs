//! Inter-task communication channels
//!
//! Static channels between the button, controller and print tasks, built
//! on embassy-sync primitives.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use stratum_core::link::MotionLink;
use stratum_core::scheduler::RunId;
use stratum_core::state::{Button, Event};

/// Channel capacity for debounced button presses
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Channel capacity for print task events
const EVENT_CHANNEL_SIZE: usize = 4;

/// Latest print request; a newer START overwrites one not yet picked up
pub type PrintRequests = Signal<CriticalSectionRawMutex, RunId>;
pub type PanelEvents = Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_SIZE>;
pub type CancelSignal = Signal<CriticalSectionRawMutex, ()>;

/// The motion link, held by whichever task is talking to the board
pub type SharedLink<P> = Mutex<CriticalSectionRawMutex, MotionLink<P>>;

/// Debounced presses from the button task
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, Button, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Print outcomes and job failures from the print task
pub static EVENT_CHANNEL: PanelEvents = Channel::new();

/// START accepted; the print task should acquire a job and run it
pub static PRINT_REQUEST: PrintRequests = Signal::new();

/// STOP pressed; wakes any cancellable wait in the print task
pub static CANCEL: CancelSignal = Signal::new();
