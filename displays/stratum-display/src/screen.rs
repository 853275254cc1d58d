//! Status screen buffer
//!
//! Holds the two lines currently shown. Lines are clipped to the display
//! width and padded with spaces so a shorter message fully overwrites a
//! longer one on the device.

use heapless::String;

/// Number of character rows on the panel LCD
pub const SCREEN_ROWS: usize = 2;

/// Number of character columns on the panel LCD
pub const SCREEN_COLS: usize = 16;

/// Two-line buffer with change tracking
#[derive(Clone, Debug)]
pub struct StatusScreen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    dirty: bool,
}

impl Default for StatusScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusScreen {
    /// Create a blank screen; it starts dirty so the first render clears
    /// whatever the device showed at power-up
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| blank()),
            dirty: true,
        }
    }

    /// Set one row; returns true if the visible text changed
    pub fn set_line(&mut self, row: usize, text: &str) -> bool {
        let Some(slot) = self.lines.get_mut(row) else {
            return false;
        };
        let fitted = fit(text);
        if *slot == fitted {
            return false;
        }
        *slot = fitted;
        self.dirty = true;
        true
    }

    /// Set both rows; returns true if either changed
    pub fn set_lines(&mut self, line1: &str, line2: &str) -> bool {
        let first = self.set_line(0, line1);
        let second = self.set_line(1, line2);
        first || second
    }

    /// Get the content of a specific row, padded to full width
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Force the next render (e.g. after a device error)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn blank() -> String<SCREEN_COLS> {
    fit("")
}

/// Clip to the display width, replace non-ASCII, pad with spaces
fn fit(text: &str) -> String<SCREEN_COLS> {
    let mut line = String::new();
    for c in text.chars().take(SCREEN_COLS) {
        let c = if c.is_ascii() && !c.is_ascii_control() { c } else { '?' };
        let _ = line.push(c);
    }
    while line.len() < SCREEN_COLS {
        let _ = line.push(' ');
    }
    line
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusScreen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Screen[{}, {}]",
            self.lines[0].as_str(),
            self.lines[1].as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_padded() {
        let mut screen = StatusScreen::new();
        screen.set_lines("Starting...", "");
        assert_eq!(screen.get_line(0), Some("Starting...     "));
        assert_eq!(screen.get_line(1), Some("                "));
    }

    #[test]
    fn test_long_line_clipped() {
        let mut screen = StatusScreen::new();
        screen.set_line(0, "0123456789abcdefXYZ");
        assert_eq!(screen.get_line(0), Some("0123456789abcdef"));
    }

    #[test]
    fn test_non_ascii_replaced() {
        let mut screen = StatusScreen::new();
        screen.set_line(0, "Capa ñ");
        assert_eq!(screen.get_line(0), Some("Capa ?          "));
    }

    #[test]
    fn test_same_text_is_coalesced() {
        let mut screen = StatusScreen::new();
        assert!(screen.set_lines("Insert media", "with valid job"));
        screen.mark_clean();
        assert!(!screen.set_lines("Insert media", "with valid job"));
        assert!(!screen.is_dirty());
        // Trailing spaces do not count as a change
        assert!(!screen.set_line(0, "Insert media    "));
    }

    #[test]
    fn test_out_of_range_row() {
        let mut screen = StatusScreen::new();
        screen.mark_clean();
        assert!(!screen.set_line(2, "nope"));
        assert!(!screen.is_dirty());
        assert_eq!(screen.get_line(2), None);
    }
}
