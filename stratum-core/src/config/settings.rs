//! Printer settings file parser
//!
//! The settings file travels on the media next to the job. It is a
//! console rc file: one `set <key> <value>` per line, `#` starts a
//! comment. Lines that are not `set` commands and keys this controller
//! does not use are skipped, so the same file can drive the console.
//!
//! ```text
//! # exposure
//! set project_tiempo_exposicion 2.0
//! set project_pausa 2.5
//! set project_primera_capa 20
//! ```

use core::str::FromStr;

use super::exposure::PrinterSettings;

/// Errors while reading the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// A `set` line without both key and value (1-based line number)
    MalformedLine { line: usize },
    /// A known key whose value is not a valid number
    InvalidValue { line: usize },
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::MalformedLine { line } => write!(f, "line {}: malformed set command", line),
            SettingsError::InvalidValue { line } => write!(f, "line {}: invalid number", line),
        }
    }
}

/// Apply the settings in `text` on top of `base`
pub fn parse_settings(text: &str, base: PrinterSettings) -> Result<PrinterSettings, SettingsError> {
    let mut settings = base;

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = content.split_whitespace();
        if tokens.next() != Some("set") {
            continue;
        }
        let (key, value) = match (tokens.next(), tokens.next()) {
            (Some(key), Some(value)) => (key, value),
            _ => return Err(SettingsError::MalformedLine { line }),
        };

        let exposure = &mut settings.exposure;
        let projector = &mut settings.projector;
        match key {
            "project_tiempo_exposicion" => exposure.interval_s = number_at(value, line)?,
            "project_pausa" => exposure.pause_s = number_at(value, line)?,
            "project_elevacion" => exposure.overshoot_mm = number_at(value, line)?,
            "project_primera_capa" => exposure.first_layer_time_s = number_at(value, line)?,
            "project_velocidad_z" => exposure.z_rate = number_at(value, line)?,
            "project_x" => projector.width_px = number_at(value, line)?,
            "project_y" => projector.height_px = number_at(value, line)?,
            "project_x_proyectada" => projector.projected_width_mm = number_at(value, line)?,
            // port, baudrate and console-only keys
            _ => {}
        }
    }

    Ok(settings)
}

fn number_at<T: FromStr>(value: &str, line: usize) -> Result<T, SettingsError> {
    value
        .parse()
        .map_err(|_| SettingsError::InvalidValue { line })
}
