//! GPIO input abstractions

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Check if the pin is at its asserted level
    fn is_active(&self, level: ActiveLevel) -> bool {
        match level {
            ActiveLevel::Low => self.is_low(),
            ActiveLevel::High => self.is_high(),
        }
    }
}

/// Logic level at which an input counts as asserted
///
/// Panel buttons are wired to ground with the internal pull-up enabled,
/// so they are active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    #[default]
    Low,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    impl InputPin for Fixed {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_low() {
        assert!(Fixed(false).is_active(ActiveLevel::Low));
        assert!(!Fixed(true).is_active(ActiveLevel::Low));
    }

    #[test]
    fn test_active_high() {
        assert!(Fixed(true).is_active(ActiveLevel::High));
        assert!(!Fixed(false).is_active(ActiveLevel::High));
    }
}
