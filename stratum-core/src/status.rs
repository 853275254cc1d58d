//! Fixed status texts shown on the two-line panel display

/// Width of one display line in characters
pub const LINE_WIDTH: usize = 16;

/// Canned two-line status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusMessage {
    /// Shown once at startup
    Welcome,
    /// START accepted, job being loaded
    Starting,
    /// No job could be acquired from the media
    InsertMedia,
    /// STOP handled
    MachineStopped,
    /// Last layer exposed and platform parked
    PrintFinished,
}

impl StatusMessage {
    /// The two display lines for this message
    pub fn lines(&self) -> (&'static str, &'static str) {
        match self {
            StatusMessage::Welcome => (" Stratum ready", "  Press START"),
            StatusMessage::Starting => ("Starting...", ""),
            StatusMessage::InsertMedia => ("Insert media", "with valid job"),
            StatusMessage::MachineStopped => (" Machine stopped", ""),
            StatusMessage::PrintFinished => ("    Print", "   finished"),
        }
    }
}
