//! RF-related registers
//!
//! This module contains registers related to the synthesizer and the modem:
//! - Synthesizer word, band and charge pump
//! - Channel spacing and channel number
//! - Modulation type and data rate
//! - Frequency deviation and constellation mapping

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::InvalidValue;

/// Mask of the synthesizer word held in SYNT3..SYNT0
pub const SYNTH_WORD_MASK: u32 = 0x0FFF_FFFF;

/// Synthesizer band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SynthBand {
    /// 826-1055 MHz, band divider 4
    High,
    /// 413-527 MHz, band divider 8
    Mid,
}

impl SynthBand {
    /// Synthesizer output divider for the band
    pub const fn divider(self) -> u32 {
        match self {
            Self::High => 4,
            Self::Mid => 8,
        }
    }
}

/// Synthesizer register group (address: 0x05)
///
/// Covers SYNT3 to SYNT0.
///
/// # Register Layout
/// - SYNT3 bits 7:5: Charge pump current select
/// - SYNT3 bit 4: Band select (0 = high band, 1 = mid band)
/// - SYNT3 bits 3:0 and SYNT2..SYNT0: 28-bit synthesizer word, MSB first
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Synthesizer {
    /// Charge pump current select (ISEL)
    pub charge_pump_select: u8,
    /// Synthesizer band
    pub band: SynthBand,
    /// Synthesizer word
    pub word: u32,
}

/// Channel spacing register (address: 0x0C)
///
/// Channel spacing in units of Fxo/2^15.
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ChannelSpacing {
    pub value: u8,
}

/// Channel number register (address: 0x0D)
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ChannelNumber {
    pub value: u8,
}

/// Modulation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modulation {
    /// 2-FSK
    Fsk2 = 0x0,
    /// 4-FSK
    Fsk4 = 0x1,
    /// 2-GFSK, BT = 1
    Gfsk2 = 0x2,
    /// 4-GFSK, BT = 1
    Gfsk4 = 0x3,
    /// ASK/OOK
    AskOok = 0x5,
    /// Direct polar
    Polar = 0x6,
    /// Unmodulated carrier
    None = 0x7,
    /// 2-GFSK, BT = 0.5
    Gfsk2Bt05 = 0xA,
    /// 4-GFSK, BT = 0.5
    Gfsk4Bt05 = 0xB,
}

impl TryFrom<u8> for Modulation {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(Self::Fsk2),
            0x1 => Ok(Self::Fsk4),
            0x2 => Ok(Self::Gfsk2),
            0x3 => Ok(Self::Gfsk4),
            0x5 => Ok(Self::AskOok),
            0x6 => Ok(Self::Polar),
            0x7 => Ok(Self::None),
            0xA => Ok(Self::Gfsk2Bt05),
            0xB => Ok(Self::Gfsk4Bt05),
            invalid => Err(InvalidValue(invalid)),
        }
    }
}

/// Data rate and modulation register group (address: 0x0E)
///
/// Covers MOD4, MOD3 and MOD2.
///
/// # Register Layout
/// - MOD4, MOD3: 16-bit data rate mantissa, MSB first
/// - MOD2 bits 7:4: Modulation type
/// - MOD2 bits 3:0: Data rate exponent
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct DataRate {
    /// Data rate mantissa
    pub mantissa: u16,
    /// Modulation code, decoded by [`Modulation::try_from`]
    pub modulation: u8,
    /// Data rate exponent (0-15)
    pub exponent: u8,
}

/// Frequency deviation register group (address: 0x11)
///
/// Covers MOD1 and MOD0.
///
/// # Register Layout
/// - MOD1 bit 7: PA ramp interpolation
/// - MOD1 bit 6: Frequency interpolation
/// - MOD1 bits 5:4: Constellation mapping
/// - MOD1 bits 3:0: Frequency deviation exponent
/// - MOD0: Frequency deviation mantissa
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrequencyDeviation {
    /// PA power ramp interpolation
    pub ramp_interpolation: bool,
    /// Frequency interpolation for GFSK shaping
    pub frequency_interpolation: bool,
    /// Symbol to frequency mapping for 4-(G)FSK (0-3)
    pub constellation_mapping: u8,
    /// Deviation exponent (0-15)
    pub exponent: u8,
    /// Deviation mantissa
    pub mantissa: u8,
}

/// Synthesizer configuration register (address: 0x65)
///
/// # Important Notes
/// - pfd_split together with the SYNT3 charge pump select sets the charge pump
///   current, see [`ChargePumpCurrent`](crate::radio::ChargePumpCurrent)
/// - All other bits are preserved
#[register(0x65u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SynthConfig2 {
    /// Split the PFD time
    pub pfd_split: bool,
    /// Bits other than bit 2
    pub reserved: u8,
}

impl FromByteArray for Synthesizer {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            charge_pump_select: bytes[0] >> 5,
            band: if bytes[0] & 0x10 != 0 {
                SynthBand::Mid
            } else {
                SynthBand::High
            },
            word: u32::from_be_bytes(bytes) & SYNTH_WORD_MASK,
        })
    }
}

impl ToByteArray for Synthesizer {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = (self.word & SYNTH_WORD_MASK).to_be_bytes();
        bytes[0] |= (self.charge_pump_select & 0x07) << 5;
        if self.band == SynthBand::Mid {
            bytes[0] |= 0x10;
        }
        Ok(bytes)
    }
}

impl FromByteArray for ChannelSpacing {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for ChannelSpacing {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for ChannelNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for ChannelNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for DataRate {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            mantissa: u16::from_be_bytes([bytes[0], bytes[1]]),
            modulation: bytes[2] >> 4,
            exponent: bytes[2] & 0x0F,
        })
    }
}

impl ToByteArray for DataRate {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [msb, lsb] = self.mantissa.to_be_bytes();
        Ok([
            msb,
            lsb,
            ((self.modulation & 0x0F) << 4) | (self.exponent & 0x0F),
        ])
    }
}

impl FromByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            ramp_interpolation: bytes[0] & 0x80 != 0,
            frequency_interpolation: bytes[0] & 0x40 != 0,
            constellation_mapping: (bytes[0] >> 4) & 0x03,
            exponent: bytes[0] & 0x0F,
            mantissa: bytes[1],
        })
    }
}

impl ToByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut mod1 = ((self.constellation_mapping & 0x03) << 4) | (self.exponent & 0x0F);
        if self.ramp_interpolation {
            mod1 |= 0x80;
        }
        if self.frequency_interpolation {
            mod1 |= 0x40;
        }
        Ok([mod1, self.mantissa])
    }
}

impl FromByteArray for SynthConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pfd_split: bytes[0] & 0x04 != 0,
            reserved: bytes[0] & !0x04,
        })
    }
}

impl ToByteArray for SynthConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let split = if self.pfd_split { 0x04 } else { 0x00 };
        Ok([(self.reserved & !0x04) | split])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizer_fields_share_synt3() {
        let synth = Synthesizer::from_bytes([0b0101_0110, 0x20, 0x00, 0x01]).unwrap();
        assert_eq!(synth.charge_pump_select, 0b010);
        assert_eq!(synth.band, SynthBand::Mid);
        assert_eq!(synth.word, 0x0620_0001);
        assert_eq!(synth.to_bytes().unwrap(), [0b0101_0110, 0x20, 0x00, 0x01]);
    }

    #[test]
    fn unknown_modulation_code_is_kept_raw() {
        let rate = DataRate::from_bytes([0x12, 0x34, 0x47]).unwrap();
        assert_eq!(rate.mantissa, 0x1234);
        assert_eq!(rate.exponent, 7);
        assert_eq!(Modulation::try_from(rate.modulation), Err(InvalidValue(0x4)));
        assert_eq!(rate.to_bytes().unwrap(), [0x12, 0x34, 0x47]);
    }
}
