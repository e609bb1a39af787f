//! Register definitions for the S2-LP radio
//! Generated from the S2-LP datasheet (DocID029110)
//!
//! Registers that hold a single logical value spread over several addresses,
//! such as the synthesizer word or the packet length, are described as one
//! register starting at the lowest address. Fields the driver does not
//! interpret are kept in a `reserved` field so that read-modify-write
//! sequences leave them untouched.

mod packet;
mod power;
mod rf;
mod rx;
mod system;
mod tx;

pub use packet::*;
pub use power::*;
pub use rf::*;
pub use rx::*;
pub use system::*;
pub use tx::*;

/// Error returned when a register field holds a value with no defined meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidValue(pub u8);

/// Address of the TX/RX FIFO
pub const FIFO_ADDRESS: u8 = 0xFF;
