//! Board-agnostic core logic for the resin printer panel
//!
//! This crate contains all control logic that does not depend on the
//! host it runs on:
//!
//! - Panel state machine (pure transitions producing actions)
//! - Button edge detection and debouncing
//! - Job and layer model
//! - Exposure configuration and the printer settings file
//! - Print scheduler step sequencing, progress and ETA
//! - Motion link over a reopenable serial port
//! - Collaborator traits (status sink, projector, job source)

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod input;
pub mod job;
pub mod link;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod traits;
