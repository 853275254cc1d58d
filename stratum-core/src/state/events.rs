//! Events that trigger state transitions

use crate::scheduler::{RunId, RunOutcome};

/// The four panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Start,
    Stop,
    JogUp,
    JogDown,
}

impl Button {
    /// All buttons in scan order
    pub const ALL: [Button; 4] = [Button::Start, Button::Stop, Button::JogUp, Button::JogDown];

    /// Dense index for per-button tables
    pub const fn index(self) -> usize {
        match self {
            Button::Start => 0,
            Button::Stop => 1,
            Button::JogUp => 2,
            Button::JogDown => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Start => "start",
            Button::Stop => "stop",
            Button::JogUp => "jog-up",
            Button::JogDown => "jog-down",
        }
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A debounced button press
    Pressed(Button),

    // Print task events
    /// START could not acquire a job from the media
    JobUnavailable(RunId),
    /// The print run ended
    PrintEnded(RunId, RunOutcome),

    // Controller events
    /// STOP actions have been carried out
    StopComplete,
}

impl Event {
    /// The print request a print task event belongs to
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            Event::JobUnavailable(id) | Event::PrintEnded(id, _) => Some(*id),
            Event::Pressed(_) | Event::StopComplete => None,
        }
    }
}
