//! Motion controller wire protocol
//!
//! This crate defines the plain-text protocol spoken between the panel
//! controller and the Z-axis motion board. The protocol is deliberately
//! minimal: one command per line, no checksums, no line numbers and no
//! resend handshake.
//!
//! # Protocol Overview
//!
//! ```text
//! panel  ──►  "G90\n"                   absolute positioning
//! panel  ──►  "M210 Z160\n"             max Z feed
//! panel  ──►  "G0 Z400\n"               rapid move
//! panel  ──►  "G2 O3.000000 L0.100000\n" peel move (overshoot, layer)
//! board  ──►  "ok\n"                    acknowledgement
//! ```
//!
//! The board only acknowledges; it never reports position. Everything
//! above the "is it alive" probe is open-loop.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod line;
pub mod response;
pub mod sequence;

pub use command::{CommandLine, MotionCommand, ProtocolError, MAX_COMMAND_LEN};
pub use line::{LineError, LineParser, MAX_LINE_LEN};
pub use response::Response;
pub use sequence::{MotionSequence, TRAVEL_FEED_Z};
