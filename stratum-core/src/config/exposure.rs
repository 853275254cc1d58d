//! Exposure and projector configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable per-run exposure parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExposureConfig {
    /// Steady-state exposure per layer (s)
    pub interval_s: f64,
    /// Settle after each rise (s)
    pub pause_s: f64,
    /// Peel travel beyond the layer (mm)
    pub overshoot_mm: f64,
    /// Layer thickness used until a job supplies its own (mm)
    pub thickness_mm: f64,
    /// Exposure of the first layer (s)
    pub first_layer_time_s: f64,
    /// Z feed rate of the motion board
    pub z_rate: u32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            interval_s: 2.0,
            pause_s: 2.5,
            overshoot_mm: 3.0,
            thickness_mm: 0.1,
            first_layer_time_s: 20.0,
            z_rate: 200,
        }
    }
}

impl ExposureConfig {
    /// Exposure hold for the layer at `index` (ms)
    pub fn exposure_ms(&self, index: usize) -> u64 {
        if index == 0 {
            seconds_to_ms(self.first_layer_time_s)
        } else {
            seconds_to_ms(self.interval_s)
        }
    }

    /// Peel overshoot for the layer at `index` (mm)
    ///
    /// The first layer peels three times as far to break the adhesion film.
    pub fn overshoot_for(&self, index: usize) -> f64 {
        if index == 0 {
            self.overshoot_mm * 3.0
        } else {
            self.overshoot_mm
        }
    }

    /// Post-rise pause for the layer at `index` (ms)
    pub fn pause_ms(&self, index: usize) -> u64 {
        if index == 0 {
            seconds_to_ms(self.pause_s * 3.0)
        } else {
            seconds_to_ms(self.pause_s)
        }
    }
}

/// Convert seconds to whole milliseconds; negative or NaN becomes 0
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    // Round to nearest without libm
    (seconds * 1000.0 + 0.5) as u64
}

/// Projector output geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectorGeometry {
    /// Horizontal resolution (px)
    pub width_px: u32,
    /// Vertical resolution (px)
    pub height_px: u32,
    /// Width of the projected area on the vat floor (mm)
    pub projected_width_mm: f64,
}

impl Default for ProjectorGeometry {
    fn default() -> Self {
        Self {
            width_px: 1024,
            height_px: 768,
            projected_width_mm: 150.0,
        }
    }
}

impl ProjectorGeometry {
    /// Scale factor from part millimetres to projector pixels
    pub fn pixels_per_mm(&self) -> f64 {
        if self.projected_width_mm > 0.0 {
            f64::from(self.width_px) / self.projected_width_mm
        } else {
            1.0
        }
    }
}

/// Everything read from a job's settings file
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrinterSettings {
    pub exposure: ExposureConfig,
    pub projector: ProjectorGeometry,
}
