//! Transmitter settings

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::Device;
use crate::registers::{
    FrequencyDeviation, PaPower0, PaPowerRamp, PacketControl1, Protocol0, TxFifoStatus,
    TxFifoThresholds, TxSource,
};
use crate::Error;

const POWER_LEVEL_MAX: u8 = 0x7F;
const STEP_LENGTH_MAX: u8 = 0b11;
const MAX_STEP_MAX: u8 = 0b111;
const FIFO_THRESHOLD_MAX: u8 = 0x7F;
const RETRANSMISSIONS_MAX: u8 = 0x0F;

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Transmits at a fixed PA level.
    ///
    /// Fills the whole ramp table with `level`, selects the last step and
    /// turns ramping off.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Level above 127
    pub fn set_static_power_level(&mut self, level: u8) -> Result<(), Error> {
        if level > POWER_LEVEL_MAX {
            return Err(Error::InvalidArgument);
        }
        self.write_register(PaPowerRamp { levels: [level; 8] })?;
        self.modify_register::<PaPower0, _>(|pa| PaPower0 {
            max_step: MAX_STEP_MAX,
            ramp_enabled: false,
            ..pa
        })
    }

    /// Writes the PA ramp table, PA_POWER8 first
    pub fn set_power_ramp(&mut self, levels: [u8; 8]) -> Result<(), Error> {
        if levels.iter().any(|level| *level > POWER_LEVEL_MAX) {
            return Err(Error::InvalidArgument);
        }
        self.write_register(PaPowerRamp { levels })
    }

    /// Reads the PA ramp table, PA_POWER8 first
    pub fn power_ramp(&mut self) -> Result<[u8; 8], Error> {
        Ok(self.read_register::<PaPowerRamp>()?.levels)
    }

    /// Sets the ramp step length in eighths of a symbol (0-3)
    pub fn set_power_ramp_step_length(&mut self, length: u8) -> Result<(), Error> {
        if length > STEP_LENGTH_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<PaPower0, _>(|pa| PaPower0 {
            step_length: length,
            ..pa
        })
    }

    /// Reads the ramp step length
    pub fn power_ramp_step_length(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<PaPower0>()?.step_length)
    }

    /// Sets the index of the last ramp step (0-7)
    pub fn set_power_ramp_max_step(&mut self, step: u8) -> Result<(), Error> {
        if step > MAX_STEP_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<PaPower0, _>(|pa| PaPower0 {
            max_step: step,
            ..pa
        })
    }

    /// Reads the index of the last ramp step
    pub fn power_ramp_max_step(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<PaPower0>()?.max_step)
    }

    /// Enables PA power ramping
    pub fn set_ramping_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PaPower0, _>(|pa| PaPower0 {
            ramp_enabled: enabled,
            ..pa
        })
    }

    /// Checks whether PA power ramping is enabled
    pub fn is_ramping_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PaPower0>()?.ramp_enabled)
    }

    /// Enables the +14 dBm boost, bypassing the ramp table
    pub fn set_max_power(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PaPower0, _>(|pa| PaPower0 {
            max_power: enabled,
            ..pa
        })
    }

    /// Checks whether the +14 dBm boost is enabled
    pub fn is_max_power(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PaPower0>()?.max_power)
    }

    /// Enables interpolation between ramp steps
    pub fn set_ramp_interpolation(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<FrequencyDeviation, _>(|dev| FrequencyDeviation {
            ramp_interpolation: enabled,
            ..dev
        })
    }

    /// Checks whether ramp interpolation is enabled
    pub fn ramp_interpolation(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<FrequencyDeviation>()?.ramp_interpolation)
    }

    /// Selects where transmitted data comes from
    pub fn set_tx_source(&mut self, source: TxSource) -> Result<(), Error> {
        self.modify_register::<PacketControl1, _>(|ctrl| PacketControl1 {
            tx_source: source,
            ..ctrl
        })
    }

    /// Reads the TX data source
    pub fn tx_source(&mut self) -> Result<TxSource, Error> {
        Ok(self.read_register::<PacketControl1>()?.tx_source)
    }

    /// Sets the TX FIFO almost full threshold (0-127)
    pub fn set_tx_fifo_almost_full_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > FIFO_THRESHOLD_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<TxFifoThresholds, _>(|fifo| TxFifoThresholds {
            almost_full: threshold,
            ..fifo
        })
    }

    /// Reads the TX FIFO almost full threshold
    pub fn tx_fifo_almost_full_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<TxFifoThresholds>()?.almost_full)
    }

    /// Sets the TX FIFO almost empty threshold (0-127)
    pub fn set_tx_fifo_almost_empty_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        if threshold > FIFO_THRESHOLD_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<TxFifoThresholds, _>(|fifo| TxFifoThresholds {
            almost_empty: threshold,
            ..fifo
        })
    }

    /// Reads the TX FIFO almost empty threshold
    pub fn tx_fifo_almost_empty_threshold(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<TxFifoThresholds>()?.almost_empty)
    }

    /// Number of bytes waiting in the TX FIFO
    pub fn tx_fifo_count(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<TxFifoStatus>()?.count)
    }

    /// Sets the maximum number of automatic retransmissions (0-15)
    pub fn set_retransmissions(&mut self, tries: u8) -> Result<(), Error> {
        if tries > RETRANSMISSIONS_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<Protocol0, _>(|proto| Protocol0 {
            max_retransmissions: tries,
            ..proto
        })
    }

    /// Reads the maximum number of automatic retransmissions
    pub fn retransmissions(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Protocol0>()?.max_retransmissions)
    }
}
