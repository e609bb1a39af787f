//! System registers
//!
//! This module contains registers related to device-wide configuration:
//! - Oscillator configuration and RCO calibration
//! - Interrupt masks and status
//! - Device identification

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Interrupt sources
    ///
    /// Used both for the interrupt mask and the interrupt status. The
    /// registers hold the 30 sources over four bytes, most significant first.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupts: u32 {
        /// RX data ready
        const RX_DATA_READY = 1 << 0;
        /// RX data discarded after filtering
        const RX_DATA_DISCARDED = 1 << 1;
        /// TX data sent
        const TX_DATA_SENT = 1 << 2;
        /// Maximum number of retransmissions reached
        const MAX_RETX_REACHED = 1 << 3;
        /// CRC error
        const CRC_ERROR = 1 << 4;
        /// TX FIFO underflow or overflow
        const TX_FIFO_ERROR = 1 << 5;
        /// RX FIFO underflow or overflow
        const RX_FIFO_ERROR = 1 << 6;
        const TX_FIFO_ALMOST_FULL = 1 << 7;
        const TX_FIFO_ALMOST_EMPTY = 1 << 8;
        const RX_FIFO_ALMOST_FULL = 1 << 9;
        const RX_FIFO_ALMOST_EMPTY = 1 << 10;
        /// Maximum number of CSMA back-offs reached
        const MAX_BACKOFF_REACHED = 1 << 11;
        const VALID_PREAMBLE = 1 << 12;
        const VALID_SYNC = 1 << 13;
        const RSSI_ABOVE_THRESHOLD = 1 << 14;
        /// Wake-up timeout in LDC mode
        const WAKEUP_TIMEOUT = 1 << 15;
        const READY = 1 << 16;
        /// STANDBY state entered after a delay
        const STANDBY_DELAYED = 1 << 17;
        const LOW_BATTERY = 1 << 18;
        /// Power-on reset
        const POR = 1 << 19;
        /// Brown-out event
        const BOR = 1 << 20;
        const LOCK = 1 << 21;
        const VCO_CALIBRATION_END = 1 << 22;
        const PA_CALIBRATION_END = 1 << 23;
        const PM_COUNT_EXPIRED = 1 << 24;
        const XO_COUNT_EXPIRED = 1 << 25;
        const TX_START_TIME = 1 << 26;
        const RX_START_TIME = 1 << 27;
        const RX_TIMEOUT = 1 << 28;
        const RX_SNIFF_TIMEOUT = 1 << 29;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Interrupts {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Interrupts({=u32:#x})", self.bits())
    }
}

/// Interrupt mask register group (address: 0x50)
///
/// Covers IRQ_MASK3 to IRQ_MASK0. A set bit routes the source to the
/// interrupt output.
#[register(0x50u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct InterruptMask {
    pub interrupts: Interrupts,
}

/// Crystal and RC oscillator configuration register (address: 0x6D)
///
/// XO_RCO_CONF0.
///
/// # Important Notes
/// - ref_div must be set when the crystal is 48 MHz or above
/// - Setting rco_calibration starts a calibration of the RC oscillator,
///   completion is reported in the status bytes
#[register(0x6Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct XoRcoConfig0 {
    /// Bit 3: divide the reference clock by two
    pub ref_div: bool,
    /// Bit 0: RCO calibration enable
    pub rco_calibration: bool,
    /// Bits 7:4 and 2:1
    pub reserved: u8,
}

/// Device information register group (address: 0xF0)
///
/// Covers DEVICE_INFO1 and DEVICE_INFO0.
#[register(0xF0u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct DeviceInfo {
    /// Part number, 0x03 for the S2-LP
    pub part_number: u8,
    /// Silicon version
    pub version: u8,
}

/// Interrupt status register group (address: 0xFA)
///
/// Covers IRQ_STATUS3 to IRQ_STATUS0. The flags are latched until the
/// registers are read or cleared.
#[register(0xFAu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct InterruptStatus {
    pub interrupts: Interrupts,
}

impl FromByteArray for InterruptMask {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            interrupts: Interrupts::from_bits_retain(u32::from_be_bytes(bytes)),
        })
    }
}

impl ToByteArray for InterruptMask {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.interrupts.bits().to_be_bytes())
    }
}

impl FromByteArray for XoRcoConfig0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            ref_div: bytes[0] & 0x08 != 0,
            rco_calibration: bytes[0] & 0x01 != 0,
            reserved: bytes[0] & 0xF6,
        })
    }
}

impl ToByteArray for XoRcoConfig0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0xF6) | (self.ref_div as u8) << 3 | self.rco_calibration as u8])
    }
}

impl FromByteArray for DeviceInfo {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            part_number: bytes[0],
            version: bytes[1],
        })
    }
}

impl FromByteArray for InterruptStatus {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            interrupts: Interrupts::from_bits_retain(u32::from_be_bytes(bytes)),
        })
    }
}

impl ToByteArray for InterruptStatus {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.interrupts.bits().to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_bytes_are_big_endian() {
        let status = InterruptStatus::from_bytes([0x00, 0x00, 0x00, 0x05]).unwrap();
        assert_eq!(
            status.interrupts,
            Interrupts::RX_DATA_READY | Interrupts::TX_DATA_SENT
        );

        let mask = InterruptMask {
            interrupts: Interrupts::RX_TIMEOUT | Interrupts::READY,
        };
        assert_eq!(mask.to_bytes().unwrap(), [0x10, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn ref_div_preserves_other_bits() {
        let conf = XoRcoConfig0::from_bytes([0xB0]).unwrap();
        assert!(!conf.ref_div);
        let conf = XoRcoConfig0 {
            ref_div: true,
            ..conf
        };
        assert_eq!(conf.to_bytes().unwrap(), [0xB8]);
    }
}
