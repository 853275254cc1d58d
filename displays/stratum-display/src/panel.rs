//! Status sink over a display backend

use stratum_core::traits::StatusSink;

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::StatusScreen;

/// Renders status text to a backend, skipping unchanged writes
pub struct StatusPanel<B> {
    backend: B,
    screen: StatusScreen,
    last_error: Option<DisplayError>,
}

impl<B: DisplayBackend> StatusPanel<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            screen: StatusScreen::new(),
            last_error: None,
        }
    }

    /// Push the buffer to the device if it changed
    pub fn render(&mut self) -> Result<(), DisplayError> {
        if !self.screen.is_dirty() {
            return Ok(());
        }
        for (row, line) in self.screen.lines().enumerate() {
            self.backend.draw_text(row as u8, 0, line)?;
        }
        self.backend.flush()?;
        self.screen.mark_clean();
        Ok(())
    }

    pub fn screen(&self) -> &StatusScreen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Most recent device error, cleared by the next successful render
    pub fn last_error(&self) -> Option<DisplayError> {
        self.last_error
    }
}

impl<B: DisplayBackend> StatusSink for StatusPanel<B> {
    fn set_lines(&mut self, line1: &str, line2: &str) {
        self.screen.set_lines(line1, line2);
        // A failed render leaves the screen dirty so the next write retries
        self.last_error = self.render().err();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::status::StatusMessage;

    #[derive(Default)]
    struct CountingBackend {
        draws: usize,
        flushes: usize,
        rows: [heapless::String<16>; 2],
        fail: bool,
    }

    impl DisplayBackend for CountingBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn draw_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.draws += 1;
            let slot = &mut self.rows[row as usize];
            slot.clear();
            slot.push_str(text).unwrap();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (16, 2)
        }
    }

    #[test]
    fn test_writes_are_coalesced() {
        let mut panel = StatusPanel::new(CountingBackend::default());
        panel.show(StatusMessage::MachineStopped);
        panel.show(StatusMessage::MachineStopped);
        assert_eq!(panel.backend().flushes, 1);
        assert_eq!(panel.backend().rows[0].as_str(), " Machine stopped");
    }

    #[test]
    fn test_change_is_rendered() {
        let mut panel = StatusPanel::new(CountingBackend::default());
        panel.show(StatusMessage::Starting);
        panel.show(StatusMessage::InsertMedia);
        assert_eq!(panel.backend().flushes, 2);
        assert_eq!(panel.backend().rows[1].as_str(), "with valid job  ");
    }

    #[test]
    fn test_failed_render_retried() {
        let mut panel = StatusPanel::new(CountingBackend {
            fail: true,
            ..CountingBackend::default()
        });
        panel.show(StatusMessage::Starting);
        assert_eq!(panel.last_error(), Some(DisplayError::Communication));
        assert!(panel.screen().is_dirty());

        panel.backend.fail = false;
        panel.show(StatusMessage::Starting);
        assert_eq!(panel.last_error(), None);
        assert_eq!(panel.backend().flushes, 1);
    }
}
