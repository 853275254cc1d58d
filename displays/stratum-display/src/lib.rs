//! Status display for the printer panel
//!
//! This crate provides:
//! - `DisplayBackend` trait for the character display hardware
//! - `StatusScreen`, a two-line buffer that only reports real changes
//! - `StatusPanel`, which implements the core `StatusSink` on top of both
//!
//! The panel is a 16x2 character LCD. Progress updates from the print
//! path and canned messages from the button path both land here, so
//! every write goes through the screen buffer and identical text never
//! reaches the device twice.

#![no_std]

pub mod backend;
pub mod panel;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use panel::StatusPanel;
pub use screen::{StatusScreen, SCREEN_COLS, SCREEN_ROWS};
