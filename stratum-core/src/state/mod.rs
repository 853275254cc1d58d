//! Panel state machine
//!
//! The machine holds exactly one `MachineState`. Every change goes through
//! `MachineState::transition`, a pure function of the current state and an
//! event that also yields the side effects the caller must perform, in
//! order.

pub mod action;
pub mod events;
pub mod machine;

pub use action::{Action, Transition, MAX_ACTIONS};
pub use events::{Button, Event};
pub use machine::{MachineState, StateError};
