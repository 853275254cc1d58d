//! Per-button refractory window

use crate::state::Button;

/// Window after an accepted press during which the same button is ignored
pub const DEBOUNCE_WINDOW_MS: u64 = 500;

/// Delay before the confirming re-read of a pin
pub const SETTLE_READ_MS: u64 = 50;

/// Accepts at most one press per button per window
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted: [Option<u64>; 4],
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW_MS)
    }
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted: [None; 4],
        }
    }

    /// Decide whether an edge at `now_ms` counts as a press
    ///
    /// Rejected edges do not extend the window.
    pub fn accept(&mut self, button: Button, now_ms: u64) -> bool {
        let slot = &mut self.last_accepted[button.index()];
        if let Some(last) = *slot {
            if now_ms.saturating_sub(last) < self.window_ms {
                return false;
            }
        }
        *slot = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_edges_within_window() {
        let mut d = Debouncer::default();
        assert!(d.accept(Button::Start, 1_000));
        assert!(!d.accept(Button::Start, 1_499));
        assert!(d.accept(Button::Start, 1_500));
    }

    #[test]
    fn test_rejected_edge_does_not_extend_window() {
        let mut d = Debouncer::default();
        assert!(d.accept(Button::Stop, 0));
        assert!(!d.accept(Button::Stop, 400));
        assert!(d.accept(Button::Stop, 500));
    }

    #[test]
    fn test_windows_are_per_button() {
        let mut d = Debouncer::default();
        assert!(d.accept(Button::JogUp, 10));
        assert!(d.accept(Button::JogDown, 20));
        assert!(!d.accept(Button::JogUp, 30));
    }

    #[test]
    fn test_first_press_at_time_zero() {
        let mut d = Debouncer::default();
        assert!(d.accept(Button::Start, 0));
    }

    proptest! {
        #[test]
        fn test_accepted_presses_are_spaced(mut times in proptest::collection::vec(0u64..10_000, 1..50)) {
            times.sort_unstable();
            let mut d = Debouncer::default();
            let mut last: Option<u64> = None;
            for t in times {
                if d.accept(Button::Start, t) {
                    if let Some(prev) = last {
                        prop_assert!(t - prev >= DEBOUNCE_WINDOW_MS);
                    }
                    last = Some(t);
                }
            }
        }
    }
}
