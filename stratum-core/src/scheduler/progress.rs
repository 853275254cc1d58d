//! Progress and time-remaining estimate

use core::fmt::Write;

use heapless::String;

use crate::config::ExposureConfig;
use crate::status::LINE_WIDTH;

/// Fixed per-layer overhead added to the estimate (s)
const LAYER_OVERHEAD_S: f64 = 0.5;

/// Room for two `usize` counts, separators and a percentage
const COUNT_SCRATCH: usize = 48;

/// Progress snapshot published before each layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    /// Layers already finished
    pub index: usize,
    pub layer_count: usize,
    pub percent: u8,
    /// Estimated seconds until the last layer is done
    pub remaining_s: f64,
}

impl Progress {
    /// Compute the snapshot at layer `index`
    ///
    /// The first layer's longer exposure is added once, while it is
    /// still ahead.
    pub fn at(index: usize, layer_count: usize, config: &ExposureConfig) -> Self {
        if layer_count == 0 {
            return Self {
                index,
                layer_count,
                percent: 100,
                remaining_s: 0.0,
            };
        }
        let index = index.min(layer_count);
        let percent = (index * 100 / layer_count) as u8;
        let mut remaining_s = (layer_count - index) as f64
            * (config.interval_s + config.pause_s + LAYER_OVERHEAD_S);
        if index == 0 {
            remaining_s += config.first_layer_time_s;
        }
        Self {
            index,
            layer_count,
            percent,
            remaining_s,
        }
    }

    /// First display line: `Time: HH:MM:SS`
    pub fn time_line(&self) -> String<LINE_WIDTH> {
        let total = if self.remaining_s > 0.0 {
            (self.remaining_s + 0.5) as u64
        } else {
            0
        };
        let hours = (total / 3600).min(99);
        let minutes = (total / 60) % 60;
        let seconds = total % 60;
        let mut line = String::new();
        let _ = write!(line, "Time: {:02}:{:02}:{:02}", hours, minutes, seconds);
        line
    }

    /// Second display line: `done/total  pct%`, right-aligned
    ///
    /// Large jobs narrow the separator first, then drop the total; the
    /// line always ends with the percentage.
    pub fn count_line(&self) -> String<LINE_WIDTH> {
        let mut body: String<COUNT_SCRATCH> = String::new();
        let _ = write!(body, "{}/{}  {}%", self.index, self.layer_count, self.percent);
        if body.len() > LINE_WIDTH {
            body.clear();
            let _ = write!(body, "{}/{} {}%", self.index, self.layer_count, self.percent);
        }
        if body.len() > LINE_WIDTH {
            body.clear();
            let _ = write!(body, "{} {}%", self.index, self.percent);
        }
        let body = &body[body.len().saturating_sub(LINE_WIDTH)..];

        let mut line = String::new();
        for _ in body.len()..LINE_WIDTH {
            let _ = line.push(' ');
        }
        let _ = line.push_str(body);
        line
    }
}
