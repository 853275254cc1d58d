//! Motion link
//!
//! Owns the serial connection to the motion board. The board firmware only
//! forgets stale input when the port is released and reacquired, so every
//! burst of commands is followed by a close, and jogs and prints start
//! with a double reopen ([`MotionLink::reset_cycle`]).

mod motion;

pub use motion::{LinkError, LinkState, MotionLink};
