//! Acknowledgements from the motion controller

/// A classified line received from the motion controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// The controller accepted a command
    Ok,
    /// Anything else (echo, banner, debug chatter)
    Other,
}

impl Response {
    /// Classify a received line; trailing `\r` and whitespace are ignored
    pub fn parse(line: &str) -> Self {
        if line.trim_start().starts_with("ok") {
            Response::Ok
        } else {
            Response::Other
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok)
    }
}
