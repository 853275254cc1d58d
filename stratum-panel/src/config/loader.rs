//! Configuration file loading
//!
//! Falls back to the embedded defaults if the file is missing or invalid.

use std::fs;
use std::path::{Path, PathBuf};

use stratum_hal_linux::{GpioAllocator, GpioError};
use thiserror::Error;
use tracing::{error, info, warn};

use super::PanelConfig;

/// Embedded default configuration (compiled into the binary)
pub const EMBEDDED_CONFIG: &str = include_str!("../../panel.toml");

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid pin assignment: {0}")]
    Pins(#[from] GpioError),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<PanelConfig, ConfigError> {
    let config: PanelConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Read `path`, or the embedded defaults when `path` is `None`
///
/// Any failure with a given file is logged and the embedded defaults are
/// used instead, so the panel always comes up.
pub fn load_config(path: Option<&Path>) -> PanelConfig {
    if let Some(path) = path {
        match read_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                return config;
            }
            Err(e) => warn!(error = %e, "configuration unusable, using embedded defaults"),
        }
    }

    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // build.rs validates panel.toml, so this is a development slip
            error!(error = %e, "embedded configuration invalid, using built-in values");
            PanelConfig::default()
        }
    }
}

fn read_file(path: &Path) -> Result<PanelConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

fn validate(config: &PanelConfig) -> Result<(), ConfigError> {
    let mut allocator = GpioAllocator::new();
    for pin in config.pins.in_scan_order() {
        allocator.allocate(pin)?;
    }
    if config.timing.button_poll_ms == 0 {
        return Err(ConfigError::Zero("timing.button_poll_ms"));
    }
    if config.timing.probe_interval_ms == 0 {
        return Err(ConfigError::Zero("timing.probe_interval_ms"));
    }
    if config.serial.baudrate == 0 {
        return Err(ConfigError::Zero("serial.baudrate"));
    }
    Ok(())
}
