//! Feature level device accessors
//!
//! The methods in this module are thin read-modify-write wrappers over the
//! typed registers in [`registers`](crate::registers). Each one reads the
//! register holding the setting, changes only the requested field and writes
//! the register back, so unrelated settings sharing the register are kept.
//!
//! Methods are grouped by feature:
//! - [`rf`]: synthesizer, channel and modem settings
//! - [`rx`]: receive chain, AFC, AGC and link quality
//! - [`tx`]: power amplifier and transmit FIFO
//! - [`packet`]: packet handler framing, coding and filtering
//! - [`gpio`]: GPIO pin modes and signals
//! - [`power`]: power management
//! - [`irq`]: interrupt status and masks
//!
//! # Important Notes
//! - Arguments outside the range of their register field return
//!   [`Error::InvalidArgument`](crate::Error::InvalidArgument) before any
//!   bus access.
//! - Most settings should only be changed in READY or STANDBY.

pub mod gpio;
pub mod irq;
pub mod packet;
pub mod power;
pub mod rf;
pub mod rx;
pub mod tx;

pub use gpio::{GpioPin, InputMode, OutputMode, PinConfig};
pub use packet::DataCoding;
pub use rf::ChargePumpCurrent;
pub use rx::{AgcLowThreshold, TimerStopConditions};
