//! Synthesizer and modem settings

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::codec::{Codec, DATA_RATE_EXPONENT_MAX, DEVIATION_EXPONENT_MAX};
use crate::device::Device;
use crate::registers::{
    ChannelNumber, ChannelSpacing, DataRate, FrequencyDeviation, Modulation, SynthBand,
    SynthConfig2, Synthesizer, XoRcoConfig0, SYNTH_WORD_MASK,
};
use crate::Error;

/// Charge pump current of the synthesizer PLL
///
/// Each current is a combination of the SYNT3 ISEL field and the
/// SYNTH_CONFIG2 PFD split bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargePumpCurrent {
    Ua120,
    Ua200,
    Ua140,
    Ua240,
}

impl ChargePumpCurrent {
    /// ISEL field value and PFD split state
    pub const fn encode(self) -> (u8, bool) {
        match self {
            Self::Ua120 => (0b010, false),
            Self::Ua200 => (0b001, true),
            Self::Ua140 => (0b011, false),
            Self::Ua240 => (0b010, true),
        }
    }

    /// Recovers the current from the ISEL field and PFD split state
    pub const fn decode(isel: u8, pfd_split: bool) -> Option<Self> {
        match (isel, pfd_split) {
            (0b010, false) => Some(Self::Ua120),
            (0b001, true) => Some(Self::Ua200),
            (0b011, false) => Some(Self::Ua140),
            (0b010, true) => Some(Self::Ua240),
            _ => None,
        }
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Builds a [`Codec`] from the crystal and the band and reference divider
    /// currently configured on the chip
    pub fn codec(&mut self) -> Result<Codec, Error> {
        let band = self.read_register::<Synthesizer>()?.band;
        let ref_div = self.read_register::<XoRcoConfig0>()?.ref_div;
        Ok(Codec::new(self.clock_frequency(), band, ref_div))
    }

    /// Sets the synthesizer charge pump current
    pub fn set_charge_pump_current(&mut self, current: ChargePumpCurrent) -> Result<(), Error> {
        let (isel, pfd_split) = current.encode();
        self.modify_register::<Synthesizer, _>(|synth| Synthesizer {
            charge_pump_select: isel,
            ..synth
        })?;
        self.modify_register::<SynthConfig2, _>(|conf| SynthConfig2 { pfd_split, ..conf })
    }

    /// Reads the charge pump current
    ///
    /// # Errors
    /// * `Error::Deserialization` - The ISEL and PFD split combination is not
    ///   one of the four defined currents
    pub fn charge_pump_current(&mut self) -> Result<ChargePumpCurrent, Error> {
        let isel = self.read_register::<Synthesizer>()?.charge_pump_select;
        let pfd_split = self.read_register::<SynthConfig2>()?.pfd_split;
        ChargePumpCurrent::decode(isel, pfd_split).ok_or(Error::Deserialization)
    }

    /// Selects the synthesizer band, keeping the word and charge pump
    pub fn set_synth_band(&mut self, band: SynthBand) -> Result<(), Error> {
        self.modify_register::<Synthesizer, _>(|synth| Synthesizer { band, ..synth })
    }

    /// Reads the synthesizer band
    pub fn synth_band(&mut self) -> Result<SynthBand, Error> {
        Ok(self.read_register::<Synthesizer>()?.band)
    }

    /// Writes the 28-bit synthesizer word, keeping the band and charge pump
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - The word does not fit in 28 bits
    pub fn set_synth_word(&mut self, word: u32) -> Result<(), Error> {
        if word > SYNTH_WORD_MASK {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<Synthesizer, _>(|synth| Synthesizer { word, ..synth })
    }

    /// Reads the 28-bit synthesizer word
    pub fn synth_word(&mut self) -> Result<u32, Error> {
        Ok(self.read_register::<Synthesizer>()?.word)
    }

    /// Programs the synthesizer for a base frequency in Hz.
    ///
    /// The band and reference divider must already be configured.
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The frequency is out of reach of the
    ///   synthesizer word
    pub fn set_base_frequency(&mut self, frequency: u32) -> Result<(), Error> {
        let word = self.codec()?.synth_word(frequency)?;
        self.set_synth_word(word)
    }

    /// Base frequency in Hz
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The programmed frequency does not fit in
    ///   a `u32`
    pub fn base_frequency(&mut self) -> Result<u32, Error> {
        let codec = self.codec()?;
        codec.base_frequency(self.synth_word()?)
    }

    /// Sets the channel spacing in units of Fxo/2^15
    pub fn set_channel_spacing(&mut self, spacing: u8) -> Result<(), Error> {
        self.write_register(ChannelSpacing { value: spacing })
    }

    /// Reads the channel spacing
    pub fn channel_spacing(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<ChannelSpacing>()?.value)
    }

    /// Selects the channel number
    pub fn set_channel_number(&mut self, channel: u8) -> Result<(), Error> {
        self.write_register(ChannelNumber { value: channel })
    }

    /// Reads the channel number
    pub fn channel_number(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<ChannelNumber>()?.value)
    }

    /// Center frequency of the selected channel in Hz
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The frequency does not fit in a `u32`
    pub fn center_frequency(&mut self) -> Result<u32, Error> {
        let codec = self.codec()?;
        let base = codec.base_frequency(self.synth_word()?)?;
        let spacing = self.channel_spacing()?;
        let channel = self.channel_number()?;
        codec.center_frequency(base, spacing, channel)
    }

    /// Sets the modulation scheme, keeping the data rate
    pub fn set_modulation(&mut self, modulation: Modulation) -> Result<(), Error> {
        self.modify_register::<DataRate, _>(|rate| DataRate {
            modulation: modulation as u8,
            ..rate
        })
    }

    /// Reads the modulation scheme
    ///
    /// # Errors
    /// * `Error::Deserialization` - MOD2 holds an undefined modulation code
    pub fn modulation(&mut self) -> Result<Modulation, Error> {
        let code = self.read_register::<DataRate>()?.modulation;
        Modulation::try_from(code).map_err(|_| Error::Deserialization)
    }

    /// Writes the data rate mantissa and exponent, keeping the modulation
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Exponent above 15
    pub fn set_data_rate_raw(&mut self, mantissa: u16, exponent: u8) -> Result<(), Error> {
        if exponent > DATA_RATE_EXPONENT_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<DataRate, _>(|rate| DataRate {
            mantissa,
            exponent,
            ..rate
        })
    }

    /// Data rate mantissa and exponent
    pub fn data_rate_raw(&mut self) -> Result<(u16, u8), Error> {
        let rate = self.read_register::<DataRate>()?;
        Ok((rate.mantissa, rate.exponent))
    }

    /// Sets the data rate in bps
    pub fn set_data_rate(&mut self, data_rate: u32) -> Result<(), Error> {
        let (mantissa, exponent) = self.codec()?.encode_data_rate(data_rate)?;
        self.set_data_rate_raw(mantissa, exponent)
    }

    /// Data rate in bps
    pub fn data_rate(&mut self) -> Result<u32, Error> {
        let (mantissa, exponent) = self.data_rate_raw()?;
        self.codec()?.data_rate(mantissa, exponent)
    }

    /// Writes the frequency deviation mantissa and exponent
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Exponent above 15
    pub fn set_frequency_deviation_raw(&mut self, mantissa: u8, exponent: u8) -> Result<(), Error> {
        if exponent > DEVIATION_EXPONENT_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<FrequencyDeviation, _>(|dev| FrequencyDeviation {
            mantissa,
            exponent,
            ..dev
        })
    }

    /// Frequency deviation mantissa and exponent
    pub fn frequency_deviation_raw(&mut self) -> Result<(u8, u8), Error> {
        let dev = self.read_register::<FrequencyDeviation>()?;
        Ok((dev.mantissa, dev.exponent))
    }

    /// Sets the frequency deviation in Hz
    pub fn set_frequency_deviation(&mut self, deviation: u32) -> Result<(), Error> {
        let (mantissa, exponent) = self.codec()?.encode_frequency_deviation(deviation)?;
        self.set_frequency_deviation_raw(mantissa, exponent)
    }

    /// Frequency deviation in Hz
    pub fn frequency_deviation(&mut self) -> Result<f64, Error> {
        let (mantissa, exponent) = self.frequency_deviation_raw()?;
        self.codec()?.frequency_deviation(mantissa, exponent)
    }

    /// Sets the 4-(G)FSK constellation mapping (0-3)
    pub fn set_constellation_mapping(&mut self, mapping: u8) -> Result<(), Error> {
        if mapping > 0b11 {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<FrequencyDeviation, _>(|dev| FrequencyDeviation {
            constellation_mapping: mapping,
            ..dev
        })
    }

    /// Reads the 4-(G)FSK constellation mapping
    pub fn constellation_mapping(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<FrequencyDeviation>()?.constellation_mapping)
    }

    /// Enables frequency interpolation for GFSK shaping
    pub fn set_frequency_interpolation(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<FrequencyDeviation, _>(|dev| FrequencyDeviation {
            frequency_interpolation: enabled,
            ..dev
        })
    }

    /// Checks whether frequency interpolation is enabled
    pub fn frequency_interpolation(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<FrequencyDeviation>()?.frequency_interpolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_pump_combinations_are_reversible() {
        for current in [
            ChargePumpCurrent::Ua120,
            ChargePumpCurrent::Ua200,
            ChargePumpCurrent::Ua140,
            ChargePumpCurrent::Ua240,
        ] {
            let (isel, split) = current.encode();
            assert_eq!(ChargePumpCurrent::decode(isel, split), Some(current));
        }
        assert_eq!(ChargePumpCurrent::decode(0b001, false), None);
    }
}
