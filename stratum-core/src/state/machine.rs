//! State machine definition
//!
//! All panel behavior is a function of the current state and an event.

use stratum_protocol::MotionSequence;

use super::action::{Action, Transition};
use super::events::{Button, Event};
use crate::status::StatusMessage;

/// Machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineState {
    /// At rest, ready for any button
    #[default]
    Idle,
    /// A job is being acquired or printed
    Printing,
    /// STOP actions in progress
    Stopping,
    /// Last jog was upward
    RaisingZ,
    /// Last jog was downward
    LoweringZ,
}

/// Raised when an event is not accepted in the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateError {
    InvalidTransition {
        from: MachineState,
        event: Event,
    },
}

impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StateError::InvalidTransition { from, event } => {
                write!(f, "event {:?} not accepted in state {:?}", event, from)
            }
        }
    }
}

impl MachineState {
    /// Process an event and return the next state with its actions
    ///
    /// Events the current state does not accept leave it unchanged and
    /// produce no actions.
    pub fn transition(self, event: Event) -> Transition {
        use Action::*;
        use MachineState::*;

        match (self, event) {
            // START is rejected while printing to prevent re-entrant runs
            (state, Event::Pressed(Button::Start)) if state != Printing => Transition::with(
                Printing,
                &[ShowStatus(StatusMessage::Starting), BeginPrint],
            ),

            // Outcomes of older requests are filtered by run id before
            // they reach the machine
            (Printing, Event::JobUnavailable(_)) => {
                Transition::with(Idle, &[ShowStatus(StatusMessage::InsertMedia)])
            }
            (Printing, Event::PrintEnded(..)) => Transition::to(Idle),

            (state, Event::Pressed(Button::Stop)) if state != Stopping => Transition::with(
                Stopping,
                &[
                    CancelRun,
                    ResetLink,
                    SendSequence(MotionSequence::Raise),
                    CloseLink,
                    ShowStatus(StatusMessage::MachineStopped),
                ],
            ),
            (Stopping, Event::StopComplete) => Transition::to(Idle),

            (Idle | LoweringZ, Event::Pressed(Button::JogUp)) => Transition::with(
                RaisingZ,
                &[
                    ResetLink,
                    Settle,
                    SendSequence(MotionSequence::Raise),
                    CloseLink,
                ],
            ),
            (Idle | RaisingZ, Event::Pressed(Button::JogDown)) => Transition::with(
                LoweringZ,
                &[
                    ResetLink,
                    Settle,
                    SendSequence(MotionSequence::Lower),
                    CloseLink,
                ],
            ),

            // Default: stay in current state
            _ => Transition::to(self),
        }
    }

    /// Like [`transition`](Self::transition) but reports ignored events
    pub fn try_transition(self, event: Event) -> Result<Transition, StateError> {
        let transition = self.transition(event);
        if transition.is_noop(self) {
            Err(StateError::InvalidTransition { from: self, event })
        } else {
            Ok(transition)
        }
    }
}
