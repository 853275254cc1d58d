//! Linux HAL for the printer panel
//!
//! This crate provides the Raspberry Pi implementations of the HAL traits:
//! - GPIO pin allocation and pulled-up button inputs (`rppal`)
//! - The motion board serial device (`serialport`)

pub mod gpio;
pub mod uart;

pub use gpio::{GpioAllocator, GpioError, PanelPin, GPIO_COUNT};
pub use uart::{SerialDevice, SerialError};
