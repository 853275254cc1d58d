//! Configuration loading and parsing
//!
//! The daemon reads a TOML file (serde + toml). The copy of `panel.toml`
//! compiled into the binary is the fallback when no file is given or the
//! given one is unusable.

pub mod loader;

use std::path::PathBuf;

use serde::Deserialize;
use stratum_core::config::{ExposureConfig, PrinterSettings, ProjectorGeometry};
use stratum_core::input::{DEBOUNCE_WINDOW_MS, SETTLE_READ_MS};
use stratum_hal::UartConfig;

pub use loader::{load_config, parse_config, ConfigError, EMBEDDED_CONFIG};

/// Complete daemon configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub serial: SerialConfig,
    pub pins: PinConfig,
    pub media: MediaConfig,
    pub projector: ProjectorConfig,
    pub timing: TimingConfig,
    pub exposure: ExposureConfig,
    pub geometry: ProjectorGeometry,
}

impl PanelConfig {
    /// Settings a job starts from before its own settings file is applied
    pub fn base_settings(&self) -> PrinterSettings {
        PrinterSettings {
            exposure: self.exposure,
            projector: self.geometry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    pub path: String,
    pub baudrate: u32,
    pub read_timeout_ms: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".into(),
            baudrate: 115_200,
            read_timeout_ms: 20,
        }
    }
}

impl SerialConfig {
    pub fn uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baudrate,
            timeout_ms: self.read_timeout_ms,
            ..UartConfig::default()
        }
    }
}

/// BCM pin numbers of the four buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinConfig {
    pub start: u8,
    pub stop: u8,
    pub jog_up: u8,
    pub jog_down: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            start: 23,
            stop: 18,
            jog_up: 24,
            jog_down: 25,
        }
    }
}

impl PinConfig {
    /// Pins in `Button::ALL` order
    pub fn in_scan_order(&self) -> [u8; 4] {
        [self.start, self.stop, self.jog_up, self.jog_down]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub mount_dir: PathBuf,
    /// Extension of job files, matched case-insensitively
    pub job_extension: String,
    /// Settings file name next to the job on the media
    pub settings_file: String,
    pub staged_job: PathBuf,
    pub staged_settings: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            mount_dir: "/media/usb0".into(),
            job_extension: "svg".into(),
            settings_file: "config.txt".into(),
            staged_job: "/var/lib/stratum/job.svg".into(),
            staged_settings: "/var/lib/stratum/config.txt".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectorConfig {
    pub frame_path: PathBuf,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            frame_path: "/run/stratum/frame.svg".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Pause between the link reset and a jog move
    pub jog_settle_ms: u64,
    /// Pause between reopening the link and a peel move
    pub rise_settle_ms: u64,
    pub ready_timeout_ms: u32,
    pub probe_interval_ms: u32,
    pub button_poll_ms: u64,
    pub debounce_ms: u64,
    pub settle_read_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            jog_settle_ms: 1_000,
            rise_settle_ms: 2_000,
            ready_timeout_ms: 10_000,
            probe_interval_ms: 250,
            button_poll_ms: 5,
            debounce_ms: DEBOUNCE_WINDOW_MS,
            settle_read_ms: SETTLE_READ_MS,
        }
    }
}
