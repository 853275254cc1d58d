//! Side effects requested by a transition

use heapless::Vec;
use stratum_protocol::MotionSequence;

use super::machine::MachineState;
use crate::status::StatusMessage;

/// Most actions any single transition produces
pub const MAX_ACTIONS: usize = 6;

/// A side effect the controller must perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Replace the status display text
    ShowStatus(StatusMessage),
    /// Ask the print task to acquire a job and run it
    BeginPrint,
    /// Raise the cancellation flag of the active run, if any
    CancelRun,
    /// Toggle the motion link to clear stale controller state
    ResetLink,
    /// Wait the configured jog settle time
    Settle,
    /// Send a canned motion sequence over the link
    SendSequence(MotionSequence),
    /// Close the motion link after a burst
    CloseLink,
}

impl Action {
    /// Whether performing this action needs the motion link
    pub fn uses_link(&self) -> bool {
        matches!(
            self,
            Action::ResetLink | Action::Settle | Action::SendSequence(_) | Action::CloseLink
        )
    }
}

/// Result of applying an event to a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: MachineState,
    pub actions: Vec<Action, MAX_ACTIONS>,
}

impl Transition {
    /// Transition with no side effects
    pub fn to(next: MachineState) -> Self {
        Self {
            next,
            actions: Vec::new(),
        }
    }

    /// Transition carrying the given actions
    pub fn with(next: MachineState, actions: &[Action]) -> Self {
        let mut list = Vec::new();
        // Action lists are fixed per rule and sized within MAX_ACTIONS
        for action in actions.iter().take(MAX_ACTIONS) {
            let _ = list.push(*action);
        }
        Self {
            next,
            actions: list,
        }
    }

    /// Whether this transition leaves the state and does nothing
    pub fn is_noop(&self, from: MachineState) -> bool {
        self.next == from && self.actions.is_empty()
    }
}
