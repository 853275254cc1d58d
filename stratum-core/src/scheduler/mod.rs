//! Print scheduler
//!
//! Sequences one job through its layers. The scheduler itself performs no
//! I/O and never sleeps: each call to [`PrintScheduler::next`] hands back the
//! single next step, and the caller executes it (display, link, delay)
//! before asking again. Only one step is ever pending.

pub mod executor;
pub mod progress;
pub mod run;

pub use executor::{PrintScheduler, PrintStep, RunOutcome};
pub use progress::Progress;
pub use run::{PrintRun, RunId};
