//! Async task loops
//!
//! Each loop runs for the life of the daemon and talks to the others only
//! through the channels in `crate::channels` and the shared panel state.

pub mod buttons;
pub mod controller;
pub mod print;

pub use buttons::buttons_task;
pub use controller::controller_task;
pub use print::print_task;
