//! RF parameter conversions
//!
//! The S2-LP stores its RF settings as synthesizer words and mantissa/exponent
//! pairs whose meaning depends on the crystal frequency, the synthesizer band
//! and the reference divider. [`Codec`] captures those three inputs and
//! converts between register encodings and physical quantities. It performs no
//! I/O. The [`Device`](crate::Device) accessors in [`radio`](crate::radio)
//! build a `Codec` from the live chip configuration.
//!
//! Integer quantities (frequencies, data rates) are computed with exact
//! integer arithmetic and rounded half up. The frequency deviation and the
//! channel filter bandwidth are fractional and returned as `f64` Hz.

use crate::config::ClockFrequency;
use crate::registers::SynthBand;
use crate::Error;

/// Largest data rate mantissa
pub const DATA_RATE_MANTISSA_MAX: u16 = u16::MAX;
/// Largest data rate exponent
pub const DATA_RATE_EXPONENT_MAX: u8 = 15;
/// Largest frequency deviation mantissa
pub const DEVIATION_MANTISSA_MAX: u8 = u8::MAX;
/// Largest frequency deviation exponent
pub const DEVIATION_EXPONENT_MAX: u8 = 15;
/// Largest channel filter mantissa
pub const CHANNEL_FILTER_MANTISSA_MAX: u8 = 8;
/// Largest channel filter exponent
pub const CHANNEL_FILTER_EXPONENT_MAX: u8 = 9;
/// Largest AGC measure time register value
pub const AGC_MEASURE_TIME_MAX: u8 = 15;
/// Largest AGC hold time register value
pub const AGC_HOLD_TIME_MAX: u8 = 31;

/// Offset between the RSSI register scale and dBm
pub const RSSI_OFFSET_DBM: i16 = 146;

const SYNTH_SCALE: u64 = 1 << 20;
const CHANNEL_FILTER_REFERENCE_HZ: f64 = 26_000_000.0;

/// Channel filter bandwidths at a 26 MHz digital clock, in units of 100 Hz.
///
/// Indexed by `[mantissa][exponent]`.
const CHANNEL_FILTER_TABLE: [[u16; 10]; 9] = [
    [8001, 4509, 2247, 1123, 561, 280, 140, 70, 35, 18],
    [7951, 4259, 2124, 1062, 530, 265, 133, 66, 33, 17],
    [7684, 4032, 2011, 1005, 502, 251, 126, 63, 31, 16],
    [7368, 3808, 1900, 950, 474, 237, 119, 59, 30, 15],
    [7051, 3621, 1807, 903, 451, 226, 113, 56, 28, 14],
    [6709, 3417, 1706, 853, 426, 213, 106, 53, 27, 13],
    [6423, 3254, 1624, 812, 406, 203, 101, 51, 25, 13],
    [5867, 2945, 1471, 735, 367, 184, 92, 46, 23, 12],
    [5414, 2703, 1350, 675, 337, 169, 84, 42, 21, 11],
];

/// Rounds a non-negative value to the nearest integer, halves away from zero
///
/// Only valid for `0.0 <= value < 2^64`. Every caller passes a frequency or
/// rate term built from 32-bit register fields, which stays far inside that.
fn round(value: f64) -> f64 {
    debug_assert!((0.0..18_446_744_073_709_551_616.0).contains(&value));
    (value + 0.5) as u64 as f64
}

fn distance(a: f64, b: f64) -> f64 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Conversion context for RF parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Codec {
    clock: ClockFrequency,
    band: SynthBand,
    ref_div: bool,
}

impl Codec {
    /// Creates a codec for the given crystal, synthesizer band and reference
    /// divider state
    pub const fn new(clock: ClockFrequency, band: SynthBand, ref_div: bool) -> Self {
        Self {
            clock,
            band,
            ref_div,
        }
    }

    /// Crystal frequency
    pub const fn clock(&self) -> ClockFrequency {
        self.clock
    }

    /// Synthesizer band
    pub const fn band(&self) -> SynthBand {
        self.band
    }

    /// Whether the reference divider is enabled
    pub const fn ref_div(&self) -> bool {
        self.ref_div
    }

    fn ref_divider(&self) -> u64 {
        if self.ref_div {
            2
        } else {
            1
        }
    }

    /// (band divider / 2) * reference divider
    fn synth_divider(&self) -> u64 {
        u64::from(self.band.divider() / 2) * self.ref_divider()
    }

    fn xo(&self) -> u64 {
        u64::from(self.clock.hz())
    }

    fn fdig(&self) -> u64 {
        u64::from(self.clock.digital_hz())
    }

    fn base_frequency_hz(&self, synth_word: u32) -> u64 {
        let denominator = self.synth_divider() * SYNTH_SCALE;
        (self.xo() * u64::from(synth_word) + denominator / 2) / denominator
    }

    /// Base carrier frequency in Hz for a synthesizer word
    ///
    /// `Fxo / ((band divider / 2) * reference divider) * word / 2^20`
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The frequency does not fit in a `u32`,
    ///   which happens for large words with a fast crystal and no reference
    ///   divider
    pub fn base_frequency(&self, synth_word: u32) -> Result<u32, Error> {
        u32::try_from(self.base_frequency_hz(synth_word)).map_err(|_| Error::NotRepresentable)
    }

    /// Synthesizer word for a base carrier frequency in Hz
    ///
    /// The word is truncated, so converting it back gives a frequency at or
    /// just below the requested one.
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The word does not fit the 28-bit field
    pub fn synth_word(&self, frequency: u32) -> Result<u32, Error> {
        let word = u64::from(frequency) * self.synth_divider() * SYNTH_SCALE / self.xo();
        if word > u64::from(crate::registers::SYNTH_WORD_MASK) {
            return Err(Error::NotRepresentable);
        }
        Ok(word as u32)
    }

    fn channel_offset(&self, channel_spacing: u8, channel_number: u8) -> u64 {
        let offset = self.xo() * u64::from(channel_spacing) * u64::from(channel_number);
        (offset + (1 << 14)) >> 15
    }

    /// Center frequency in Hz of a channel
    ///
    /// `base + Fxo / 2^15 * spacing * channel`
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The sum does not fit in a `u32`
    pub fn center_frequency(
        &self,
        base: u32,
        channel_spacing: u8,
        channel_number: u8,
    ) -> Result<u32, Error> {
        u32::try_from(self.channel_offset(channel_spacing, channel_number))
            .ok()
            .and_then(|offset| base.checked_add(offset))
            .ok_or(Error::NotRepresentable)
    }

    /// Frequency step in Hz of one synthesizer word unit, rounded
    pub fn base_frequency_resolution(&self) -> u32 {
        (self.base_frequency_hz(100_001) - self.base_frequency_hz(100_000)) as u32
    }

    /// Frequency step in Hz of one channel spacing unit times one channel
    pub fn channel_resolution(&self) -> f64 {
        let first = self.channel_offset(100, 100);
        let second = self.channel_offset(100, 101);
        (second - first) as f64 / 100.0
    }

    /// Data rate in bit/s for a mantissa and exponent
    ///
    /// # Formula
    /// - exponent 0: `Fdig * m / 2^32`
    /// - exponent 15: `Fdig / (8 * m)`
    /// - otherwise: `Fdig * (2^16 + m) * 2^e / 2^33`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Exponent above 15, or a zero mantissa with exponent 15
    pub fn data_rate(&self, mantissa: u16, exponent: u8) -> Result<u32, Error> {
        let fdig = self.fdig();
        let m = u64::from(mantissa);

        let rate = match exponent {
            0 => (fdig * m + (1 << 31)) >> 32,
            DATA_RATE_EXPONENT_MAX => {
                if mantissa == 0 {
                    return Err(Error::InvalidArgument);
                }
                (fdig + 4 * m) / (8 * m)
            }
            e if e < DATA_RATE_EXPONENT_MAX => {
                (((fdig * ((1 << 16) + m)) << e) + (1 << 32)) >> 33
            }
            _ => return Err(Error::InvalidArgument),
        };

        Ok(rate as u32)
    }

    /// Smallest exponent whose range reaches above `data_rate`
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The data rate is above the maximum
    pub fn data_rate_exponent(&self, data_rate: u32) -> Result<u8, Error> {
        for exponent in 0..=DATA_RATE_EXPONENT_MAX {
            if self.data_rate(DATA_RATE_MANTISSA_MAX, exponent)? > data_rate {
                return Ok(exponent);
            }
        }

        Err(Error::NotRepresentable)
    }

    /// Mantissa encoding `data_rate` with the given exponent, rounded and
    /// clamped to the mantissa range
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Exponent above 15, or a zero data rate with exponent 15
    pub fn data_rate_mantissa(&self, data_rate: u32, exponent: u8) -> Result<u16, Error> {
        let fdig = u128::from(self.fdig());
        let rate = u128::from(data_rate);

        let mantissa: u128 = match exponent {
            0 => ((rate << 32) + fdig / 2) / fdig,
            DATA_RATE_EXPONENT_MAX => {
                if data_rate == 0 {
                    return Err(Error::InvalidArgument);
                }
                (fdig + 4 * rate) / (8 * rate)
            }
            e if e < DATA_RATE_EXPONENT_MAX => {
                let denominator = fdig << e;
                (((rate << 33) + denominator / 2) / denominator).saturating_sub(1 << 16)
            }
            _ => return Err(Error::InvalidArgument),
        };

        Ok(mantissa.min(u128::from(DATA_RATE_MANTISSA_MAX)) as u16)
    }

    /// Mantissa and exponent for a data rate in bit/s
    pub fn encode_data_rate(&self, data_rate: u32) -> Result<(u16, u8), Error> {
        let exponent = self.data_rate_exponent(data_rate)?;
        let mantissa = self.data_rate_mantissa(data_rate, exponent)?;
        Ok((mantissa, exponent))
    }

    /// Frequency deviation in Hz for a mantissa and exponent
    ///
    /// # Formula
    /// `Fxo / 2^19 * round(term) / (band divider * reference divider)` where
    /// `term` is `rd * m * bd / 8` for exponent 0 and
    /// `rd * (256 + m) * 2^(e - 1) * bd / 8` otherwise.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Exponent above 15
    pub fn frequency_deviation(&self, mantissa: u8, exponent: u8) -> Result<f64, Error> {
        if exponent > DEVIATION_EXPONENT_MAX {
            return Err(Error::InvalidArgument);
        }

        let xo_divided = self.xo() as f64 / (1u64 << 19) as f64;
        let band_divider = f64::from(self.band.divider());
        let ref_divider = self.ref_divider() as f64;

        let term = if exponent == 0 {
            ref_divider * f64::from(mantissa) * (band_divider / 8.0)
        } else {
            let scale = (1u32 << (exponent - 1)) as f64;
            ref_divider * (256.0 + f64::from(mantissa)) * scale * (band_divider / 8.0)
        };

        Ok(xo_divided * round(term) / (band_divider * ref_divider))
    }

    /// Smallest exponent whose range reaches above `deviation`
    ///
    /// # Errors
    /// * `Error::NotRepresentable` - The deviation is above the maximum
    pub fn frequency_deviation_exponent(&self, deviation: u32) -> Result<u8, Error> {
        for exponent in 0..=DEVIATION_EXPONENT_MAX {
            if self.frequency_deviation(DEVIATION_MANTISSA_MAX, exponent)? > f64::from(deviation) {
                return Ok(exponent);
            }
        }

        Err(Error::NotRepresentable)
    }

    /// Mantissa encoding `deviation` with the given exponent
    ///
    /// The mantissa is interpolated linearly between the largest deviation of
    /// the previous exponent and the largest deviation of this one, which is
    /// accurate to about one mantissa step.
    pub fn frequency_deviation_mantissa(&self, deviation: u32, exponent: u8) -> Result<u8, Error> {
        let max = self.frequency_deviation(DEVIATION_MANTISSA_MAX, exponent)? as u32;
        let min = if exponent > 0 {
            self.frequency_deviation(DEVIATION_MANTISSA_MAX, exponent - 1)? as u32
        } else {
            0
        };

        let range = max.saturating_sub(min);
        if range == 0 {
            return Err(Error::NotRepresentable);
        }

        let position = f64::from(deviation.saturating_sub(min)) / f64::from(range);
        let mantissa = round(f64::from(DEVIATION_MANTISSA_MAX) * position);
        Ok(mantissa.min(f64::from(DEVIATION_MANTISSA_MAX)) as u8)
    }

    /// Mantissa and exponent for a frequency deviation in Hz
    pub fn encode_frequency_deviation(&self, deviation: u32) -> Result<(u8, u8), Error> {
        let exponent = self.frequency_deviation_exponent(deviation)?;
        let mantissa = self.frequency_deviation_mantissa(deviation, exponent)?;
        Ok((mantissa, exponent))
    }

    /// Channel filter bandwidth in Hz
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Mantissa above 8 or exponent above 9
    pub fn channel_filter_bandwidth(&self, mantissa: u8, exponent: u8) -> Result<f64, Error> {
        if mantissa > CHANNEL_FILTER_MANTISSA_MAX || exponent > CHANNEL_FILTER_EXPONENT_MAX {
            return Err(Error::InvalidArgument);
        }

        let reference = f64::from(CHANNEL_FILTER_TABLE[mantissa as usize][exponent as usize]) * 100.0;
        Ok(reference * (self.fdig() as f64 / CHANNEL_FILTER_REFERENCE_HZ))
    }

    /// Mantissa and exponent of the channel filter closest to `bandwidth` Hz
    pub fn channel_filter_coefficients(&self, bandwidth: u32) -> (u8, u8) {
        let target = f64::from(bandwidth);
        let scale = self.fdig() as f64 / CHANNEL_FILTER_REFERENCE_HZ;

        let mut best = (0, 0);
        let mut best_distance = f64::MAX;
        for (mantissa, row) in CHANNEL_FILTER_TABLE.iter().enumerate() {
            for (exponent, entry) in row.iter().enumerate() {
                let candidate = distance(f64::from(*entry) * 100.0 * scale, target);
                if candidate < best_distance {
                    best_distance = candidate;
                    best = (mantissa as u8, exponent as u8);
                }
            }
        }

        best
    }

    /// AGC measurement interval in ns, `12 / Fdig * 2^time`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Time above 15
    pub fn agc_measure_time_ns(&self, time: u8) -> Result<u32, Error> {
        if time > AGC_MEASURE_TIME_MAX {
            return Err(Error::InvalidArgument);
        }
        Ok(((12_000_000_000u64 << time) / self.fdig()) as u32)
    }

    /// AGC hold time in ns, `12 / Fdig * time`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Time above 31
    pub fn agc_hold_time_ns(&self, time: u8) -> Result<u32, Error> {
        if time > AGC_HOLD_TIME_MAX {
            return Err(Error::InvalidArgument);
        }
        Ok((12_000_000_000u64 * u64::from(time) / self.fdig()) as u32)
    }
}

/// Converts an RSSI register value to dBm
pub fn rssi_to_dbm(rssi: u8) -> i16 {
    i16::from(rssi) - RSSI_OFFSET_DBM
}

/// Converts a level in dBm to the RSSI register scale
///
/// # Errors
/// * `Error::InvalidArgument` - The level is outside -146..=109 dBm
pub fn dbm_to_rssi(dbm: i16) -> Result<u8, Error> {
    u8::try_from(i32::from(dbm) + i32::from(RSSI_OFFSET_DBM)).map_err(|_| Error::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::SYNTH_WORD_MASK;

    const HIGH_26: Codec = Codec::new(ClockFrequency::Mhz26, SynthBand::High, false);
    const MID_50: Codec = Codec::new(ClockFrequency::Mhz50, SynthBand::Mid, true);

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            distance(actual, expected) <= tolerance,
            "{actual} not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn base_frequency_at_26mhz_high_band() {
        assert_eq!(HIGH_26.base_frequency(100_000), Ok(1_239_777));
        assert_eq!(HIGH_26.base_frequency(100_001), Ok(1_239_789));
        assert_eq!(HIGH_26.base_frequency_resolution(), 12);
    }

    #[test]
    fn synth_word_round_trips_within_one() {
        for codec in [HIGH_26, MID_50] {
            for word in [0x0010_0000u32, 0x0355_5555, 0x0456_789A, 0x0520_0000] {
                let back = codec.synth_word(codec.base_frequency(word).unwrap()).unwrap();
                assert!(back.abs_diff(word) <= 1, "{word:#x} came back as {back:#x}");
            }
        }
    }

    #[test]
    fn synth_word_for_868mhz() {
        let word = HIGH_26.synth_word(868_000_000).unwrap();
        assert_eq!(word, 70_012_612);
        assert!(868_000_000 - HIGH_26.base_frequency(word).unwrap() < 13);
    }

    #[test]
    fn synth_word_overflow_is_not_representable() {
        assert_eq!(
            MID_50.synth_word(2_000_000_000),
            Err(Error::NotRepresentable)
        );
    }

    #[test]
    fn center_frequency_adds_channel_offset() {
        // 26 MHz / 2^15 * 100 * 10 = 793457.03
        assert_eq!(HIGH_26.center_frequency(868_000_000, 100, 10), Ok(868_793_457));
        assert_eq!(HIGH_26.center_frequency(868_000_000, 0, 10), Ok(868_000_000));
        assert_close(HIGH_26.channel_resolution(), 793.46, 0.001);
    }

    #[test]
    fn round_halves_up() {
        assert_eq!(round(0.0), 0.0);
        assert_eq!(round(2.49), 2.0);
        assert_eq!(round(2.5), 3.0);
        assert_eq!(round(127.5), 128.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn round_rejects_negative_input() {
        round(-1.0);
    }

    #[test]
    fn base_frequency_beyond_u32_is_not_representable() {
        // 48 MHz * (2^28 - 1) / (2 * 2^20), about 6.14 GHz
        let codec = Codec::new(ClockFrequency::Mhz48, SynthBand::High, false);
        assert_eq!(
            codec.base_frequency(SYNTH_WORD_MASK),
            Err(Error::NotRepresentable)
        );

        for clock in [ClockFrequency::Mhz50, ClockFrequency::Mhz52] {
            let codec = Codec::new(clock, SynthBand::High, false);
            assert_eq!(
                codec.base_frequency(SYNTH_WORD_MASK),
                Err(Error::NotRepresentable)
            );
        }

        let divided = Codec::new(ClockFrequency::Mhz48, SynthBand::Mid, true);
        let frequency = divided.base_frequency(SYNTH_WORD_MASK).unwrap();
        assert!(divided.synth_word(frequency).unwrap().abs_diff(SYNTH_WORD_MASK) <= 1);
    }

    #[test]
    fn center_frequency_overflow_is_not_representable() {
        assert_eq!(
            HIGH_26.center_frequency(u32::MAX - 1_000, 255, 255),
            Err(Error::NotRepresentable)
        );
        assert_eq!(HIGH_26.center_frequency(u32::MAX, 0, 0), Ok(u32::MAX));
    }

    #[test]
    fn data_rate_regimes() {
        // 26 MHz * 65535 / 2^32
        assert_eq!(HIGH_26.data_rate(65535, 0), Ok(397));
        // 26 MHz / (8 * 1000)
        assert_eq!(HIGH_26.data_rate(1000, 15), Ok(3250));
        assert_eq!(HIGH_26.data_rate(33579, 7), Ok(38400));
    }

    #[test]
    fn data_rate_rejects_invalid_encodings() {
        assert_eq!(HIGH_26.data_rate(0, 15), Err(Error::InvalidArgument));
        assert_eq!(HIGH_26.data_rate(0, 16), Err(Error::InvalidArgument));
    }

    #[test]
    fn data_rate_round_trips_within_one_step() {
        for rate in [300u32, 1_200, 9_600, 38_400, 100_000, 250_000, 500_000] {
            let (mantissa, exponent) = HIGH_26.encode_data_rate(rate).unwrap();
            let back = HIGH_26.data_rate(mantissa, exponent).unwrap();
            let step = ((26_000_000u64 << exponent) >> 33) as u32 + 1;
            assert!(back.abs_diff(rate) <= step, "{rate} came back as {back}");
            assert!(HIGH_26.data_rate(DATA_RATE_MANTISSA_MAX, exponent).unwrap() > rate);
        }
    }

    #[test]
    fn data_rate_exponent_search() {
        assert_eq!(HIGH_26.data_rate_exponent(38_400), Ok(7));
        assert_eq!(HIGH_26.data_rate_exponent(0), Ok(0));
        assert_eq!(
            HIGH_26.data_rate_exponent(20_000_000),
            Err(Error::NotRepresentable)
        );
    }

    #[test]
    fn frequency_deviation_values() {
        // 26 MHz / 2^19 * round(255 * 0.5) / 4
        assert_close(HIGH_26.frequency_deviation(255, 0).unwrap(), 1586.91, 0.01);
        assert_close(HIGH_26.frequency_deviation(255, 4).unwrap(), 25341.03, 0.01);
        assert_eq!(
            HIGH_26.frequency_deviation(0, 16),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn frequency_deviation_round_trips_within_one_step() {
        for codec in [HIGH_26, MID_50] {
            for deviation in [1_000u32, 5_000, 20_000, 50_000, 150_000] {
                let (mantissa, exponent) = codec.encode_frequency_deviation(deviation).unwrap();
                let back = codec.frequency_deviation(mantissa, exponent).unwrap();
                let step = codec.frequency_deviation(255, exponent).unwrap()
                    - codec.frequency_deviation(254, exponent).unwrap();
                assert_close(back, f64::from(deviation), step);
            }
        }
    }

    #[test]
    fn channel_filter_lookup() {
        assert_close(HIGH_26.channel_filter_bandwidth(2, 3).unwrap(), 100_500.0, 0.01);
        // 52 MHz crystal, 26 MHz digital clock
        let divided = Codec::new(ClockFrequency::Mhz52, SynthBand::High, true);
        assert_close(divided.channel_filter_bandwidth(0, 0).unwrap(), 800_100.0, 0.01);
        let undivided = Codec::new(ClockFrequency::Mhz24, SynthBand::High, false);
        assert_close(
            undivided.channel_filter_bandwidth(0, 0).unwrap(),
            800_100.0 * 24.0 / 26.0,
            0.01,
        );
    }

    #[test]
    fn channel_filter_rejects_out_of_range_indices() {
        assert_eq!(
            HIGH_26.channel_filter_bandwidth(9, 0),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            HIGH_26.channel_filter_bandwidth(0, 10),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn channel_filter_nearest_match() {
        assert_eq!(HIGH_26.channel_filter_coefficients(100_500), (2, 3));
        assert_eq!(HIGH_26.channel_filter_coefficients(1_000_000), (0, 0));
        assert_eq!(HIGH_26.channel_filter_coefficients(0), (8, 9));
    }

    #[test]
    fn agc_times() {
        assert_eq!(HIGH_26.agc_measure_time_ns(0), Ok(461));
        assert_eq!(HIGH_26.agc_hold_time_ns(26), Ok(12_000));
        assert_eq!(HIGH_26.agc_measure_time_ns(16), Err(Error::InvalidArgument));
        assert_eq!(HIGH_26.agc_hold_time_ns(32), Err(Error::InvalidArgument));
    }

    #[test]
    fn rssi_scale() {
        assert_eq!(rssi_to_dbm(46), -100);
        assert_eq!(dbm_to_rssi(-100), Ok(46));
        assert_eq!(dbm_to_rssi(-147), Err(Error::InvalidArgument));
    }
}
