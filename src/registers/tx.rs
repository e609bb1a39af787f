//! Transmitter registers
//!
//! Power amplifier levels and ramping, and the TX FIFO thresholds and status.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// PA power ramp table (address: 0x5A)
///
/// Covers PA_POWER8 to PA_POWER1. Entry 0 is PA_POWER8, which is the level used
/// by the last ramp step.
///
/// # Important Notes
/// - Each level is 7 bits, lower values give a higher output power
/// - Only entries up to the maximum step index in PA_POWER0 are used
#[register(0x5Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaPowerRamp {
    pub levels: [u8; 8],
}

/// PA power control register (address: 0x62)
///
/// # Register Layout
/// - Bit 7: Digital smoothing
/// - Bit 6: Max power (+14 dBm boost)
/// - Bit 5: Ramp enable
/// - Bits 4:3: Ramp step length
/// - Bits 2:0: Maximum ramp step index
#[register(0x62u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaPower0 {
    pub digital_smoothing: bool,
    pub max_power: bool,
    pub ramp_enabled: bool,
    /// Step length in units of 1/8 symbol (0-3)
    pub step_length: u8,
    /// Index of the last ramp step (0-7)
    pub max_step: u8,
}

/// PA configuration register (address: 0x63)
#[register(0x63u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaConfig1 {
    /// Bit 1: FIR filter for ASK/OOK shaping
    pub fir_enabled: bool,
    pub reserved: u8,
}

/// TX FIFO thresholds register group (address: 0x3E)
///
/// Covers FIFO_CONFIG1 (almost full) and FIFO_CONFIG0 (almost empty).
#[register(0x3Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct TxFifoThresholds {
    pub almost_full: u8,
    pub almost_empty: u8,
}

/// TX FIFO status register (address: 0x8F)
#[register(0x8Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct TxFifoStatus {
    pub count: u8,
}

impl FromByteArray for PaPowerRamp {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { levels: bytes })
    }
}

impl ToByteArray for PaPowerRamp {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.levels)
    }
}

impl FromByteArray for PaPower0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            digital_smoothing: bytes[0] & 0x80 != 0,
            max_power: bytes[0] & 0x40 != 0,
            ramp_enabled: bytes[0] & 0x20 != 0,
            step_length: (bytes[0] >> 3) & 0x03,
            max_step: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for PaPower0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.digital_smoothing as u8) << 7
            | (self.max_power as u8) << 6
            | (self.ramp_enabled as u8) << 5
            | (self.step_length & 0x03) << 3
            | (self.max_step & 0x07)])
    }
}

impl FromByteArray for PaConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            fir_enabled: bytes[0] & 0x02 != 0,
            reserved: bytes[0] & !0x02,
        })
    }
}

impl ToByteArray for PaConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & !0x02) | (self.fir_enabled as u8) << 1])
    }
}

impl FromByteArray for TxFifoThresholds {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            almost_full: bytes[0] & 0x7F,
            almost_empty: bytes[1] & 0x7F,
        })
    }
}

impl ToByteArray for TxFifoThresholds {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.almost_full & 0x7F, self.almost_empty & 0x7F])
    }
}

impl FromByteArray for TxFifoStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { count: bytes[0] })
    }
}
