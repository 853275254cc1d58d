//! Button input conditioning
//!
//! Raw pin levels are turned into press events in two stages: an edge
//! detector that fires on the inactive-to-active change, then a per-button
//! debouncer with a fixed refractory window. The caller performs the
//! settle re-read between the two.

pub mod debounce;
pub mod edge;

pub use debounce::{Debouncer, DEBOUNCE_WINDOW_MS, SETTLE_READ_MS};
pub use edge::EdgeDetector;
