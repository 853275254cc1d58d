//! Panel button scanning
//!
//! Polls the four button pins. A press is an inactive-to-active edge that
//! still reads active after the settle delay and falls outside the
//! button's debounce window.

use heapless::Vec;
use stratum_core::input::{Debouncer, EdgeDetector};
use stratum_core::state::Button;
use stratum_hal::{ActiveLevel, InputPin};

pub struct ButtonScanner<I> {
    /// Pins in `Button::ALL` order
    pins: [I; 4],
    level: ActiveLevel,
    edges: EdgeDetector,
    debouncer: Debouncer,
}

impl<I: InputPin> ButtonScanner<I> {
    pub fn new(pins: [I; 4], level: ActiveLevel, debounce_ms: u64) -> Self {
        Self {
            pins,
            level,
            edges: EdgeDetector::new(),
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    fn is_active(&self, button: Button) -> bool {
        self.pins[button.index()].is_active(self.level)
    }

    /// Sample every pin; returns the buttons that just went active
    pub fn scan(&mut self) -> Vec<Button, 4> {
        let mut pressed = Vec::new();
        for button in Button::ALL {
            let active = self.is_active(button);
            if self.edges.update(button, active) {
                // At most one entry per button
                let _ = pressed.push(button);
            }
        }
        pressed
    }

    /// Second read after the settle delay
    ///
    /// Accepts the press if the pin is still active and the button is
    /// outside its debounce window.
    pub fn confirm(&mut self, button: Button, now_ms: u64) -> bool {
        self.is_active(button) && self.debouncer.accept(button, now_ms)
    }
}
