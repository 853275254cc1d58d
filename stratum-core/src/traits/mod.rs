//! Collaborator traits
//!
//! These traits define the interface between the control logic and the
//! host-specific pieces around it: the status display, the projector,
//! the job importer and the cancellable timer.

pub mod hold;
pub mod job_source;
pub mod projector;
pub mod status;

pub use hold::{Hold, HoldOutcome};
pub use job_source::JobSource;
pub use projector::Projector;
pub use status::StatusSink;
