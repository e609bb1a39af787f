//! Receive chain settings
//!
//! AFC and AGC loops, the channel filter, carrier sense, RX timer stop
//! conditions, the RX FIFO and the link quality readback.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::codec::{
    AGC_HOLD_TIME_MAX, AGC_MEASURE_TIME_MAX, CHANNEL_FILTER_EXPONENT_MAX,
    CHANNEL_FILTER_MANTISSA_MAX,
};
use crate::device::Device;
use crate::registers::{
    Afc, AfcMode, AgcControl, AgcHighThreshold, AgcLowThresholds, AgcMeasure, AntennaSelect,
    CarrierSenseMode, ChannelFilter, LinkQuality, PacketControl3, PacketFilterOptions,
    Protocol2, QualityIndicator, RssiFilter, RssiLevel, RssiLevelRun, RssiThreshold, RxFifoStatus,
    RxFifoThresholds, RxPacketInfo, RxSource,
};
use crate::Error;

const NIBBLE_MAX: u8 = 0x0F;
const FIFO_THRESHOLD_MAX: u8 = 0x7F;
const SQI_THRESHOLD_MAX: u8 = 0x07;

/// Selects one of the two AGC low thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AgcLowThreshold {
    Threshold0,
    Threshold1,
}

/// Conditions that stop the RX timer
///
/// The carrier sense, SQI and PQI conditions are combined with AND when
/// `rx_timeout_and` is set, and with OR otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerStopConditions {
    pub rx_timeout_and: bool,
    pub carrier_sense: bool,
    pub sqi: bool,
    pub pqi: bool,
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Sets the RSSI threshold in the register scale
    pub fn set_rssi_threshold(&mut self, rssi: u8) -> Result<(), Error> {
        self.write_register(RssiThreshold { value: rssi })
    }

    /// Reads the RSSI threshold
    pub fn rssi_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RssiThreshold>()?.value)
    }

    /// RSSI measured continuously while in RX
    pub fn current_rssi(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RssiLevelRun>()?.value)
    }

    /// RSSI captured at the end of the last sync word
    pub fn captured_rssi(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RssiLevel>()?.value)
    }

    /// Sets the AFC fast loop gain (0-15)
    pub fn set_afc_fast_loop_gain(&mut self, gain: u8) -> Result<(), Error> {
        if gain > NIBBLE_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<Afc, _>(|afc| Afc {
            fast_gain: gain,
            ..afc
        })
    }

    /// Reads the AFC fast loop gain
    pub fn afc_fast_loop_gain(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Afc>()?.fast_gain)
    }

    /// Sets the AFC slow loop gain (0-15)
    pub fn set_afc_slow_loop_gain(&mut self, gain: u8) -> Result<(), Error> {
        if gain > NIBBLE_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<Afc, _>(|afc| Afc {
            slow_gain: gain,
            ..afc
        })
    }

    /// Reads the AFC slow loop gain
    pub fn afc_slow_loop_gain(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Afc>()?.slow_gain)
    }

    /// Sets the length of the AFC fast period
    pub fn set_afc_fast_period(&mut self, period: u8) -> Result<(), Error> {
        self.modify_register::<Afc, _>(|afc| Afc {
            fast_period: period,
            ..afc
        })
    }

    /// Reads the length of the AFC fast period
    pub fn afc_fast_period(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Afc>()?.fast_period)
    }

    /// Selects when the AFC switches from the fast to the slow loop
    pub fn set_afc_mode(&mut self, mode: AfcMode) -> Result<(), Error> {
        self.modify_register::<Afc, _>(|afc| Afc { mode, ..afc })
    }

    /// Reads the AFC mode
    pub fn afc_mode(&mut self) -> Result<AfcMode, Error> {
        Ok(self.read_register::<Afc>()?.mode)
    }

    /// Enables automatic frequency compensation
    pub fn set_afc_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<Afc, _>(|afc| Afc { enabled, ..afc })
    }

    /// Checks whether AFC is enabled
    pub fn is_afc_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<Afc>()?.enabled)
    }

    /// Freezes the AFC correction once the sync word is found
    pub fn set_afc_freeze_on_sync(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<Afc, _>(|afc| Afc {
            freeze_on_sync: enabled,
            ..afc
        })
    }

    /// Checks whether AFC freezes on sync
    pub fn afc_freeze_on_sync(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<Afc>()?.freeze_on_sync)
    }

    /// Sets the AGC high threshold (0-15)
    pub fn set_agc_high_threshold(&mut self, value: u8) -> Result<(), Error> {
        if value > NIBBLE_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<AgcHighThreshold, _>(|agc| AgcHighThreshold {
            threshold: value,
            ..agc
        })
    }

    /// Reads the AGC high threshold
    pub fn agc_high_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<AgcHighThreshold>()?.threshold)
    }

    /// Sets one of the two AGC low thresholds (0-15)
    pub fn set_agc_low_threshold(
        &mut self,
        threshold: AgcLowThreshold,
        value: u8,
    ) -> Result<(), Error> {
        if value > NIBBLE_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<AgcLowThresholds, _>(|agc| match threshold {
            AgcLowThreshold::Threshold0 => AgcLowThresholds {
                threshold_0: value,
                ..agc
            },
            AgcLowThreshold::Threshold1 => AgcLowThresholds {
                threshold_1: value,
                ..agc
            },
        })
    }

    /// Reads one of the two AGC low thresholds
    pub fn agc_low_threshold(&mut self, threshold: AgcLowThreshold) -> Result<u8, Error> {
        let agc = self.read_register::<AgcLowThresholds>()?;
        Ok(match threshold {
            AgcLowThreshold::Threshold0 => agc.threshold_0,
            AgcLowThreshold::Threshold1 => agc.threshold_1,
        })
    }

    /// Sets the AGC measurement interval, `12 / Fdig * 2^time`
    pub fn set_agc_measure_time_raw(&mut self, time: u8) -> Result<(), Error> {
        if time > AGC_MEASURE_TIME_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<AgcMeasure, _>(|agc| AgcMeasure {
            measure_time: time,
            ..agc
        })
    }

    /// Reads the AGC measurement interval exponent
    pub fn agc_measure_time_raw(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<AgcMeasure>()?.measure_time)
    }

    /// AGC measurement interval in ns
    pub fn agc_measure_time_ns(&mut self) -> Result<u32, Error> {
        let time = self.agc_measure_time_raw()?;
        self.codec()?.agc_measure_time_ns(time)
    }

    /// Sets the AGC hold time, `12 / Fdig * time`
    pub fn set_agc_hold_time_raw(&mut self, time: u8) -> Result<(), Error> {
        if time > AGC_HOLD_TIME_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<AgcControl, _>(|agc| AgcControl {
            hold_time: time,
            ..agc
        })
    }

    /// Reads the AGC hold time in register units
    pub fn agc_hold_time_raw(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<AgcControl>()?.hold_time)
    }

    /// AGC hold time in ns
    pub fn agc_hold_time_ns(&mut self) -> Result<u32, Error> {
        let time = self.agc_hold_time_raw()?;
        self.codec()?.agc_hold_time_ns(time)
    }

    /// Enables the AGC
    pub fn set_agc_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<AgcControl, _>(|agc| AgcControl { enabled, ..agc })
    }

    /// Checks whether the AGC is enabled
    pub fn is_agc_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<AgcControl>()?.enabled)
    }

    /// Freezes the AGC gain once the sync word is found
    pub fn set_agc_freeze_on_sync(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<AgcMeasure, _>(|agc| AgcMeasure {
            freeze_on_sync: enabled,
            ..agc
        })
    }

    /// Checks whether the AGC freezes on sync
    pub fn agc_freeze_on_sync(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<AgcMeasure>()?.freeze_on_sync)
    }

    /// Selects a channel filter by table position
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Mantissa above 8 or exponent above 9
    pub fn set_channel_filter_raw(&mut self, mantissa: u8, exponent: u8) -> Result<(), Error> {
        if mantissa > CHANNEL_FILTER_MANTISSA_MAX || exponent > CHANNEL_FILTER_EXPONENT_MAX {
            return Err(Error::InvalidArgument);
        }
        self.write_register(ChannelFilter { mantissa, exponent })
    }

    /// Channel filter mantissa and exponent
    pub fn channel_filter_raw(&mut self) -> Result<(u8, u8), Error> {
        let filter = self.read_register::<ChannelFilter>()?;
        Ok((filter.mantissa, filter.exponent))
    }

    /// Selects the channel filter closest to `bandwidth` Hz
    pub fn set_channel_filter_bandwidth(&mut self, bandwidth: u32) -> Result<(), Error> {
        let (mantissa, exponent) = self.codec()?.channel_filter_coefficients(bandwidth);
        self.set_channel_filter_raw(mantissa, exponent)
    }

    /// Channel filter bandwidth in Hz
    pub fn channel_filter_bandwidth(&mut self) -> Result<f64, Error> {
        let (mantissa, exponent) = self.channel_filter_raw()?;
        self.codec()?.channel_filter_bandwidth(mantissa, exponent)
    }

    /// Selects how the carrier sense threshold is evaluated
    pub fn set_carrier_sense_mode(&mut self, mode: CarrierSenseMode) -> Result<(), Error> {
        self.modify_register::<RssiFilter, _>(|filter| RssiFilter {
            carrier_sense: mode,
            ..filter
        })
    }

    /// Reads the carrier sense mode
    pub fn carrier_sense_mode(&mut self) -> Result<CarrierSenseMode, Error> {
        Ok(self.read_register::<RssiFilter>()?.carrier_sense)
    }

    /// Current carrier sense indication
    pub fn carrier_sense(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<LinkQuality>()?.carrier_sense)
    }

    /// Blanks received data while the carrier sense is low
    pub fn set_cs_blanking(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<AntennaSelect, _>(|ant| AntennaSelect {
            cs_blanking: enabled,
            ..ant
        })
    }

    /// Checks whether carrier sense blanking is enabled
    pub fn cs_blanking(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<AntennaSelect>()?.cs_blanking)
    }

    /// Sets the conditions that stop the RX timeout timer
    pub fn set_timer_stop_conditions(
        &mut self,
        conditions: TimerStopConditions,
    ) -> Result<(), Error> {
        self.modify_register::<Protocol2, _>(|proto| Protocol2 {
            cs_timeout_mask: conditions.carrier_sense,
            sqi_timeout_mask: conditions.sqi,
            pqi_timeout_mask: conditions.pqi,
            ..proto
        })?;
        self.modify_register::<PacketFilterOptions, _>(|opts| PacketFilterOptions {
            rx_timeout_and: conditions.rx_timeout_and,
            ..opts
        })
    }

    /// Reads the conditions that stop the RX timeout timer
    pub fn timer_stop_conditions(&mut self) -> Result<TimerStopConditions, Error> {
        let proto = self.read_register::<Protocol2>()?;
        let opts = self.read_register::<PacketFilterOptions>()?;
        Ok(TimerStopConditions {
            rx_timeout_and: opts.rx_timeout_and,
            carrier_sense: proto.cs_timeout_mask,
            sqi: proto.sqi_timeout_mask,
            pqi: proto.pqi_timeout_mask,
        })
    }

    /// Selects where received data is delivered
    pub fn set_rx_source(&mut self, source: RxSource) -> Result<(), Error> {
        self.modify_register::<PacketControl3, _>(|ctrl| PacketControl3 {
            rx_source: source as u8,
            ..ctrl
        })
    }

    /// Reads the RX data source
    ///
    /// # Errors
    /// * `Error::Deserialization` - The source field holds the reserved code 3
    pub fn rx_source(&mut self) -> Result<RxSource, Error> {
        let code = self.read_register::<PacketControl3>()?.rx_source;
        RxSource::try_from(code).map_err(|_| Error::Deserialization)
    }

    /// Sets the RX FIFO almost full threshold (0-127)
    pub fn set_rx_fifo_almost_full_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > FIFO_THRESHOLD_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<RxFifoThresholds, _>(|fifo| RxFifoThresholds {
            almost_full: threshold,
            ..fifo
        })
    }

    /// Reads the RX FIFO almost full threshold
    pub fn rx_fifo_almost_full_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RxFifoThresholds>()?.almost_full)
    }

    /// Sets the RX FIFO almost empty threshold (0-127)
    pub fn set_rx_fifo_almost_empty_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > FIFO_THRESHOLD_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<RxFifoThresholds, _>(|fifo| RxFifoThresholds {
            almost_empty: threshold,
            ..fifo
        })
    }

    /// Reads the RX FIFO almost empty threshold
    pub fn rx_fifo_almost_empty_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RxFifoThresholds>()?.almost_empty)
    }

    /// Number of bytes waiting in the RX FIFO
    pub fn rx_fifo_count(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RxFifoStatus>()?.count)
    }

    /// SQI of the last packet, and whether it matched the secondary sync word
    pub fn last_packet_sqi(&mut self) -> Result<(u8, bool), Error> {
        let link = self.read_register::<LinkQuality>()?;
        Ok((link.sqi, link.secondary_sync))
    }

    /// PQI of the last packet
    pub fn last_packet_pqi(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<LinkQuality>()?.pqi)
    }

    /// Sets the sync quality threshold
    pub fn set_sqi_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > SQI_THRESHOLD_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<QualityIndicator, _>(|qi| QualityIndicator {
            sqi_threshold: threshold,
            ..qi
        })
    }

    /// Reads the sync quality threshold
    pub fn sqi_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<QualityIndicator>()?.sqi_threshold)
    }

    /// Sets the preamble quality threshold (0-15)
    pub fn set_pqi_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > NIBBLE_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<QualityIndicator, _>(|qi| QualityIndicator {
            pqi_threshold: threshold,
            ..qi
        })
    }

    /// Reads the preamble quality threshold
    pub fn pqi_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<QualityIndicator>()?.pqi_threshold)
    }

    /// Enables the sync quality check
    pub fn set_sqi_check(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<QualityIndicator, _>(|qi| QualityIndicator {
            sqi_enabled: enabled,
            ..qi
        })
    }

    /// Checks whether the sync quality check is enabled
    pub fn sqi_check(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<QualityIndicator>()?.sqi_enabled)
    }

    /// NACK flag of the last received packet
    pub fn last_packet_nack(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<RxPacketInfo>()?.nack)
    }

    /// Sequence number of the last received packet
    pub fn sequence_number(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<RxPacketInfo>()?.sequence_number)
    }
}
