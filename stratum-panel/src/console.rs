//! Status display on the log
//!
//! Stands in for the character LCD: every flushed screen is logged as
//! one event with both lines.

use stratum_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};
use tracing::info;

#[derive(Debug, Default)]
pub struct ConsoleBackend {
    rows: [String; SCREEN_ROWS],
}

impl ConsoleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn row(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(String::as_str)
    }
}

impl DisplayBackend for ConsoleBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows.iter_mut().for_each(String::clear);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let line = self
            .rows
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        let col = col as usize;
        if col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let mut chars: Vec<char> = line.chars().collect();
        chars.resize(SCREEN_COLS.max(chars.len()), ' ');
        for (slot, c) in chars[col..].iter_mut().zip(text.chars()) {
            *slot = c;
        }
        *line = chars.into_iter().take(SCREEN_COLS).collect();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        info!(
            line1 = self.rows[0].trim_end(),
            line2 = self.rows[1].trim_end(),
            "status"
        );
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
