//! Status display sink

use crate::scheduler::Progress;
use crate::status::StatusMessage;

/// Two-line text sink backed by the panel display
///
/// Implementations coalesce writes: setting the same text twice must not
/// touch the device again.
pub trait StatusSink {
    /// Replace both lines
    fn set_lines(&mut self, line1: &str, line2: &str);

    /// Show one of the canned messages
    fn show(&mut self, message: StatusMessage) {
        let (line1, line2) = message.lines();
        self.set_lines(line1, line2);
    }

    /// Show a progress snapshot
    fn show_progress(&mut self, progress: &Progress) {
        self.set_lines(&progress.time_line(), &progress.count_line());
    }
}
