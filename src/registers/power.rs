//! Power management registers

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::InvalidValue;

/// SMPS output voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmpsVoltage {
    V1_2 = 1,
    V1_3 = 2,
    V1_4 = 3,
    V1_5 = 4,
    V1_6 = 5,
    V1_7 = 6,
    V1_8 = 7,
}

impl TryFrom<u8> for SmpsVoltage {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1_2),
            2 => Ok(Self::V1_3),
            3 => Ok(Self::V1_4),
            4 => Ok(Self::V1_5),
            5 => Ok(Self::V1_6),
            6 => Ok(Self::V1_7),
            7 => Ok(Self::V1_8),
            invalid => Err(InvalidValue(invalid)),
        }
    }
}

/// Sleep mode entered by the SLEEP command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepMode {
    /// FIFO contents are lost
    A,
    /// FIFO contents are retained
    B,
}

/// Battery level detector threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BldThreshold {
    V2_7,
    V2_5,
    V2_3,
    V2_1,
}

/// How the SMPS output level is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmpsLevelMode {
    /// Configured level in both RX and TX
    Configured,
    /// Configured level in TX only, 1.4 V in RX
    FixedInRx,
}

/// Power management configuration 4 register (address: 0x75)
#[register(0x75u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PmConfig4 {
    /// Bit 5: disable the internal SMPS and use an external supply
    pub external_smps: bool,
    pub reserved: u8,
}

/// SMPS switching frequency register group (address: 0x76)
///
/// Covers PM_CONF3 and PM_CONF2.
///
/// # Register Layout
/// - PM_CONF3 bit 7: KRM enable
/// - PM_CONF3 bits 6:0 and PM_CONF2: 15-bit KRM divider ratio
#[register(0x76u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct KrmRatio {
    pub enabled: bool,
    pub ratio: u16,
}

/// Power management configuration 1 register (address: 0x78)
///
/// # Register Layout
/// - Bit 6: Battery level detector enable
/// - Bits 5:4: Battery level detector threshold
/// - Bit 3: SMPS level mode
/// - Bit 2: LDO bypass
#[register(0x78u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PmConfig1 {
    pub battery_detection: bool,
    pub bld_threshold: BldThreshold,
    pub smps_level_mode: SmpsLevelMode,
    pub ldo_bypass: bool,
    /// Bits 7, 1 and 0
    pub reserved: u8,
}

/// Power management configuration 0 register (address: 0x79)
#[register(0x79u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PmConfig0 {
    /// Bits 6:4, SMPS voltage code decoded by [`SmpsVoltage::try_from`]
    pub smps_voltage: u8,
    /// Bit 0
    pub sleep_mode: SleepMode,
    /// Bits 7 and 3:1
    pub reserved: u8,
}

impl FromByteArray for PmConfig4 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            external_smps: bytes[0] & 0x20 != 0,
            reserved: bytes[0] & !0x20,
        })
    }
}

impl ToByteArray for PmConfig4 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & !0x20) | (self.external_smps as u8) << 5])
    }
}

impl FromByteArray for KrmRatio {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x80 != 0,
            ratio: u16::from_be_bytes([bytes[0] & 0x7F, bytes[1]]),
        })
    }
}

impl ToByteArray for KrmRatio {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [msb, lsb] = (self.ratio & 0x7FFF).to_be_bytes();
        Ok([(self.enabled as u8) << 7 | msb, lsb])
    }
}

impl FromByteArray for PmConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let bld_threshold = match (bytes[0] >> 4) & 0x03 {
            0 => BldThreshold::V2_7,
            1 => BldThreshold::V2_5,
            2 => BldThreshold::V2_3,
            _ => BldThreshold::V2_1,
        };
        Ok(Self {
            battery_detection: bytes[0] & 0x40 != 0,
            bld_threshold,
            smps_level_mode: if bytes[0] & 0x08 != 0 {
                SmpsLevelMode::FixedInRx
            } else {
                SmpsLevelMode::Configured
            },
            ldo_bypass: bytes[0] & 0x04 != 0,
            reserved: bytes[0] & 0x83,
        })
    }
}

impl ToByteArray for PmConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0x83)
            | (self.battery_detection as u8) << 6
            | (self.bld_threshold as u8) << 4
            | ((self.smps_level_mode == SmpsLevelMode::FixedInRx) as u8) << 3
            | (self.ldo_bypass as u8) << 2])
    }
}

impl FromByteArray for PmConfig0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            smps_voltage: (bytes[0] >> 4) & 0x07,
            sleep_mode: if bytes[0] & 0x01 != 0 {
                SleepMode::B
            } else {
                SleepMode::A
            },
            reserved: bytes[0] & 0x8E,
        })
    }
}

impl ToByteArray for PmConfig0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0x8E)
            | (self.smps_voltage & 0x07) << 4
            | (self.sleep_mode == SleepMode::B) as u8])
    }
}
