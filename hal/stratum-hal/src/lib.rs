//! Stratum Hardware Abstraction Layer
//!
//! Traits for the two pieces of hardware the panel controller touches
//! directly: the push-button inputs and the serial link to the motion
//! board. The core crate is written against these traits only, so the
//! state machine and scheduler can be driven by mocks on the host.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  stratum-core / stratum-panel           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stratum-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stratum-hal-linux (rppal, serialport)  │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

pub use gpio::{ActiveLevel, InputPin};
pub use uart::{DataBits, FlowControl, Parity, PortControl, StopBits, Uart, UartConfig, UartRx, UartTx};
