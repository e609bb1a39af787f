//! Receiver registers
//!
//! This module contains registers controlling the receive chain:
//! - Channel filter
//! - Automatic frequency compensation (AFC)
//! - Automatic gain control (AGC)
//! - RSSI threshold and carrier sense
//! - Signal quality indicators and link measurements
//! - RX FIFO thresholds and status

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Channel filter register (address: 0x13)
///
/// The filter bandwidth is selected from a fixed table indexed by
/// mantissa (0-8) and exponent (0-9).
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ChannelFilter {
    /// Bits 7:4
    pub mantissa: u8,
    /// Bits 3:0
    pub exponent: u8,
}

/// AFC loop closing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AfcMode {
    /// Loop closed on the slicer
    Slicer,
    /// Loop closed on the second conversion stage
    SecondConversion,
}

/// AFC register group (address: 0x14)
///
/// Covers AFC2, AFC1 and AFC0.
///
/// # Register Layout
/// - AFC2 bit 7: Freeze AFC on sync word detection
/// - AFC2 bit 6: AFC enable
/// - AFC2 bit 5: AFC mode
/// - AFC1: Fast period length in samples
/// - AFC0 bits 7:4: Fast loop gain (log2)
/// - AFC0 bits 3:0: Slow loop gain (log2)
#[register(0x14u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Afc {
    pub freeze_on_sync: bool,
    pub enabled: bool,
    pub mode: AfcMode,
    /// AFC2 bits 4:0
    pub reserved: u8,
    pub fast_period: u8,
    pub fast_gain: u8,
    pub slow_gain: u8,
}

/// Carrier sense mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CarrierSenseMode {
    /// Fixed threshold
    Static,
    /// Dynamic threshold, 6 dB above the noise floor
    Dynamic6Db,
    /// Dynamic threshold, 12 dB above the noise floor
    Dynamic12Db,
    /// Dynamic threshold, 18 dB above the noise floor
    Dynamic18Db,
}

/// RSSI filter register (address: 0x17)
#[register(0x17u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RssiFilter {
    /// Bits 3:2
    pub carrier_sense: CarrierSenseMode,
    /// RSSI filter gain and unused bits
    pub reserved: u8,
}

/// RSSI threshold register (address: 0x18)
///
/// Threshold in the RSSI scale, dBm = value - 146.
#[register(0x18u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RssiThreshold {
    pub value: u8,
}

/// AGC low thresholds register (address: 0x1A)
///
/// AGCCTRL4. The AGC uses two low thresholds.
#[register(0x1Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcLowThresholds {
    /// Bits 7:4
    pub threshold_0: u8,
    /// Bits 3:0
    pub threshold_1: u8,
}

/// AGC measurement register (address: 0x1C)
///
/// AGCCTRL2.
#[register(0x1Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcMeasure {
    /// Bit 5: freeze the AGC on sync word detection
    pub freeze_on_sync: bool,
    /// Bits 3:0: measurement interval, 12/Fdig * 2^value
    pub measure_time: u8,
    /// Bits 7:6 and 4
    pub reserved: u8,
}

/// AGC high threshold register (address: 0x1D)
///
/// AGCCTRL1.
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcHighThreshold {
    /// Bits 7:4
    pub threshold: u8,
    /// Bits 3:0
    pub reserved: u8,
}

/// AGC control register (address: 0x1E)
///
/// AGCCTRL0.
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcControl {
    /// Bit 7
    pub enabled: bool,
    /// Bits 4:0: hold time after a gain change, 12/Fdig * value
    pub hold_time: u8,
    /// Bits 6:5
    pub reserved: u8,
}

/// Antenna select configuration register (address: 0x1F)
#[register(0x1Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AntennaSelect {
    /// Bit 4: do not fill the RX FIFO with data when the carrier sense is low
    pub cs_blanking: bool,
    pub reserved: u8,
}

/// Quality indicator register (address: 0x37)
///
/// # Register Layout
/// - Bits 7:5: SQI threshold
/// - Bits 4:1: PQI threshold
/// - Bit 0: SQI check enable
#[register(0x37u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct QualityIndicator {
    pub sqi_threshold: u8,
    pub pqi_threshold: u8,
    pub sqi_enabled: bool,
}

/// RX FIFO thresholds register group (address: 0x3C)
///
/// Covers FIFO_CONFIG3 (almost full) and FIFO_CONFIG2 (almost empty).
/// Both thresholds are 7 bits wide.
#[register(0x3Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RxFifoThresholds {
    pub almost_full: u8,
    pub almost_empty: u8,
}

/// RX FIFO status register (address: 0x90)
///
/// Number of bytes in the RX FIFO.
#[register(0x90u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxFifoStatus {
    pub count: u8,
}

/// RX packet information register (address: 0x9D)
#[register(0x9Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxPacketInfo {
    /// Bit 2: NACK flag of the last received packet
    pub nack: bool,
    /// Bits 1:0: sequence number of the last received packet
    pub sequence_number: u8,
}

/// Link quality register group (address: 0x9F)
///
/// Covers LINK_QUALIF2 and LINK_QUALIF1.
///
/// # Register Layout
/// - LINK_QUALIF2: PQI of the last packet
/// - LINK_QUALIF1 bit 7: Carrier sense indication
/// - LINK_QUALIF1 bit 6: Last packet matched the secondary sync word
/// - LINK_QUALIF1 bits 4:0: SQI of the last packet
#[register(0x9Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct LinkQuality {
    pub pqi: u8,
    pub carrier_sense: bool,
    pub secondary_sync: bool,
    pub sqi: u8,
}

/// RSSI level register (address: 0xA2)
///
/// RSSI captured at the end of the last sync word detection.
#[register(0xA2u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiLevel {
    pub value: u8,
}

/// Running RSSI level register (address: 0xEF)
#[register(0xEFu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiLevelRun {
    pub value: u8,
}

impl FromByteArray for ChannelFilter {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            mantissa: bytes[0] >> 4,
            exponent: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for ChannelFilter {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.mantissa << 4) | (self.exponent & 0x0F)])
    }
}

impl FromByteArray for Afc {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            freeze_on_sync: bytes[0] & 0x80 != 0,
            enabled: bytes[0] & 0x40 != 0,
            mode: if bytes[0] & 0x20 != 0 {
                AfcMode::SecondConversion
            } else {
                AfcMode::Slicer
            },
            reserved: bytes[0] & 0x1F,
            fast_period: bytes[1],
            fast_gain: bytes[2] >> 4,
            slow_gain: bytes[2] & 0x0F,
        })
    }
}

impl ToByteArray for Afc {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut afc2 = self.reserved & 0x1F;
        if self.freeze_on_sync {
            afc2 |= 0x80;
        }
        if self.enabled {
            afc2 |= 0x40;
        }
        if self.mode == AfcMode::SecondConversion {
            afc2 |= 0x20;
        }
        Ok([
            afc2,
            self.fast_period,
            (self.fast_gain << 4) | (self.slow_gain & 0x0F),
        ])
    }
}

impl FromByteArray for RssiFilter {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let carrier_sense = match (bytes[0] >> 2) & 0x03 {
            0 => CarrierSenseMode::Static,
            1 => CarrierSenseMode::Dynamic6Db,
            2 => CarrierSenseMode::Dynamic12Db,
            _ => CarrierSenseMode::Dynamic18Db,
        };
        Ok(Self {
            carrier_sense,
            reserved: bytes[0] & !0x0C,
        })
    }
}

impl ToByteArray for RssiFilter {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & !0x0C) | ((self.carrier_sense as u8) << 2)])
    }
}

impl FromByteArray for RssiThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for RssiThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for AgcLowThresholds {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            threshold_0: bytes[0] >> 4,
            threshold_1: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for AgcLowThresholds {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.threshold_0 << 4) | (self.threshold_1 & 0x0F)])
    }
}

impl FromByteArray for AgcMeasure {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            freeze_on_sync: bytes[0] & 0x20 != 0,
            measure_time: bytes[0] & 0x0F,
            reserved: bytes[0] & 0xD0,
        })
    }
}

impl ToByteArray for AgcMeasure {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let freeze = if self.freeze_on_sync { 0x20 } else { 0x00 };
        Ok([(self.reserved & 0xD0) | freeze | (self.measure_time & 0x0F)])
    }
}

impl FromByteArray for AgcHighThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            threshold: bytes[0] >> 4,
            reserved: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for AgcHighThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.threshold << 4) | (self.reserved & 0x0F)])
    }
}

impl FromByteArray for AgcControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x80 != 0,
            hold_time: bytes[0] & 0x1F,
            reserved: bytes[0] & 0x60,
        })
    }
}

impl ToByteArray for AgcControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let enabled = if self.enabled { 0x80 } else { 0x00 };
        Ok([enabled | (self.reserved & 0x60) | (self.hold_time & 0x1F)])
    }
}

impl FromByteArray for AntennaSelect {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            cs_blanking: bytes[0] & 0x10 != 0,
            reserved: bytes[0] & !0x10,
        })
    }
}

impl ToByteArray for AntennaSelect {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let blanking = if self.cs_blanking { 0x10 } else { 0x00 };
        Ok([(self.reserved & !0x10) | blanking])
    }
}

impl FromByteArray for QualityIndicator {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sqi_threshold: bytes[0] >> 5,
            pqi_threshold: (bytes[0] >> 1) & 0x0F,
            sqi_enabled: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for QualityIndicator {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.sqi_threshold << 5)
            | ((self.pqi_threshold & 0x0F) << 1)
            | self.sqi_enabled as u8])
    }
}

impl FromByteArray for RxFifoThresholds {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            almost_full: bytes[0] & 0x7F,
            almost_empty: bytes[1] & 0x7F,
        })
    }
}

impl ToByteArray for RxFifoThresholds {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.almost_full & 0x7F, self.almost_empty & 0x7F])
    }
}

impl FromByteArray for RxFifoStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { count: bytes[0] })
    }
}

impl FromByteArray for RxPacketInfo {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            nack: bytes[0] & 0x04 != 0,
            sequence_number: bytes[0] & 0x03,
        })
    }
}

impl FromByteArray for LinkQuality {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pqi: bytes[0],
            carrier_sense: bytes[1] & 0x80 != 0,
            secondary_sync: bytes[1] & 0x40 != 0,
            sqi: bytes[1] & 0x1F,
        })
    }
}

impl FromByteArray for RssiLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for RssiLevelRun {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}
