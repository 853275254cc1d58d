//! GPIO allocation and button inputs
//!
//! Tracks which BCM pins are in use so a configuration cannot wire two
//! buttons to the same line, and wraps `rppal` inputs as HAL pins.

use heapless::FnvIndexSet;
use rppal::gpio::{Gpio, InputPin as RppalInput};
use stratum_hal::InputPin;
use thiserror::Error;
use tracing::debug;

/// Number of BCM GPIO lines exposed on the Raspberry Pi header
pub const GPIO_COUNT: usize = 28;

/// Errors acquiring button pins
#[derive(Debug, Error)]
pub enum GpioError {
    #[error("GPIO {0} is not on the header")]
    InvalidPin(u8),
    #[error("GPIO {0} assigned twice")]
    PinInUse(u8),
    #[error("GPIO access failed: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), GpioError> {
        if pin as usize >= GPIO_COUNT {
            return Err(GpioError::InvalidPin(pin));
        }
        if self.allocated.contains(&pin) {
            return Err(GpioError::PinInUse(pin));
        }
        self.allocated
            .insert(pin)
            .map_err(|_| GpioError::InvalidPin(pin))?;
        Ok(())
    }

    pub fn release(&mut self, pin: u8) {
        self.allocated.remove(&pin);
    }

    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// A button input with the internal pull-up enabled
pub struct PanelPin {
    bcm: u8,
    pin: RppalInput,
}

impl PanelPin {
    /// Claim `bcm` through the allocator and configure it as a pulled-up input
    pub fn open(gpio: &Gpio, allocator: &mut GpioAllocator, bcm: u8) -> Result<Self, GpioError> {
        allocator.allocate(bcm)?;
        let pin = match gpio.get(bcm) {
            Ok(pin) => pin.into_input_pullup(),
            Err(e) => {
                allocator.release(bcm);
                return Err(e.into());
            }
        };
        debug!(bcm, "button input configured");
        Ok(Self { bcm, pin })
    }

    pub fn bcm(&self) -> u8 {
        self.bcm
    }
}

impl InputPin for PanelPin {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    fn is_low(&self) -> bool {
        self.pin.is_low()
    }
}
