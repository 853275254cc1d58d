//! Configuration types
//!
//! Exposure and projector settings travel with each job in a small
//! `set <key> <value>` settings file copied from the media.

pub mod exposure;
pub mod settings;

pub use exposure::{ExposureConfig, PrinterSettings, ProjectorGeometry};
pub use settings::{parse_settings, SettingsError};
