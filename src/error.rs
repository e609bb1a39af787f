//! Driver error type
//!
//! Every fallible operation in this crate returns [`Error`]. Transport and pin
//! errors from the HAL are flattened, so the error type does not carry the
//! peripheral generics around.

use core::fmt;

/// Errors returned by the S2-LP driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI transfer or flush failed
    Bus,
    /// Chip select or shutdown pin could not be driven
    Pin,
    /// A register held a value with no defined meaning
    Deserialization,
    /// An argument was outside the range the chip accepts.
    ///
    /// Nothing is sent to the device when this is returned.
    InvalidArgument,
    /// The requested physical quantity has no encoding on this chip
    /// with the current clock and band settings.
    NotRepresentable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("SPI bus error"),
            Self::Pin => f.write_str("GPIO pin error"),
            Self::Deserialization => f.write_str("invalid register contents"),
            Self::InvalidArgument => f.write_str("argument out of range"),
            Self::NotRepresentable => f.write_str("value cannot be encoded"),
        }
    }
}
