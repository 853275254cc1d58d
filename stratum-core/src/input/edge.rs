//! Falling-edge detection over polled levels

use crate::state::Button;

/// Remembers the last sampled level of every button
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    active: [bool; 4],
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample; returns true when the button just became active
    pub fn update(&mut self, button: Button, active: bool) -> bool {
        let slot = &mut self.active[button.index()];
        let edge = active && !*slot;
        *slot = active;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_once() {
        let mut edges = EdgeDetector::new();
        assert!(edges.update(Button::Start, true));
        assert!(!edges.update(Button::Start, true));
        assert!(!edges.update(Button::Start, false));
        assert!(edges.update(Button::Start, true));
    }

    #[test]
    fn test_buttons_are_independent() {
        let mut edges = EdgeDetector::new();
        assert!(edges.update(Button::JogUp, true));
        assert!(edges.update(Button::JogDown, true));
        assert!(!edges.update(Button::JogUp, true));
    }
}
