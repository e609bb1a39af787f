//! Power management settings

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::Device;
use crate::registers::{
    BldThreshold, KrmRatio, PaConfig1, PmConfig0, PmConfig1, PmConfig4, SleepMode, SmpsLevelMode,
    SmpsVoltage,
};
use crate::Error;

const KRM_RATIO_MAX: u16 = 0x7FFF;

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Sets the SMPS output voltage
    pub fn set_smps_voltage(&mut self, voltage: SmpsVoltage) -> Result<(), Error> {
        self.modify_register::<PmConfig0, _>(|pm| PmConfig0 {
            smps_voltage: voltage as u8,
            ..pm
        })
    }

    /// Reads the SMPS output voltage
    ///
    /// # Errors
    /// * `Error::Deserialization` - The voltage field holds the reserved code 0
    pub fn smps_voltage(&mut self) -> Result<SmpsVoltage, Error> {
        let code = self.read_register::<PmConfig0>()?.smps_voltage;
        SmpsVoltage::try_from(code).map_err(|_| Error::Deserialization)
    }

    /// Enables the KRM divider, which sets the SMPS switching frequency
    pub fn set_krm_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<KrmRatio, _>(|krm| KrmRatio { enabled, ..krm })
    }

    /// Checks whether the KRM divider is enabled
    pub fn is_krm_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<KrmRatio>()?.enabled)
    }

    /// Sets the KRM divider ratio, `Fsw = Fdig * ratio / 2^15`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Ratio above 0x7FFF
    pub fn set_krm_ratio(&mut self, ratio: u16) -> Result<(), Error> {
        if ratio > KRM_RATIO_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<KrmRatio, _>(|krm| KrmRatio { ratio, ..krm })
    }

    /// Reads the KRM divider ratio
    pub fn krm_ratio(&mut self) -> Result<u16, Error> {
        Ok(self.read_register::<KrmRatio>()?.ratio)
    }

    /// Selects the sleep mode entered by the SLEEP command
    pub fn set_sleep_mode(&mut self, mode: SleepMode) -> Result<(), Error> {
        self.modify_register::<PmConfig0, _>(|pm| PmConfig0 {
            sleep_mode: mode,
            ..pm
        })
    }

    /// Reads the sleep mode
    pub fn sleep_mode(&mut self) -> Result<SleepMode, Error> {
        Ok(self.read_register::<PmConfig0>()?.sleep_mode)
    }

    /// Bypasses the digital LDO
    pub fn set_ldo_bypass(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PmConfig1, _>(|pm| PmConfig1 {
            ldo_bypass: enabled,
            ..pm
        })
    }

    /// Checks whether the digital LDO is bypassed
    pub fn is_ldo_bypassed(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PmConfig1>()?.ldo_bypass)
    }

    /// Enables the internal SMPS. When disabled the chip expects an external
    /// supply.
    pub fn set_internal_smps(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PmConfig4, _>(|pm| PmConfig4 {
            external_smps: !enabled,
            ..pm
        })
    }

    /// Checks whether the internal SMPS is in use
    pub fn is_internal_smps_enabled(&mut self) -> Result<bool, Error> {
        Ok(!self.read_register::<PmConfig4>()?.external_smps)
    }

    /// Enables the battery level detector
    pub fn set_battery_detection(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PmConfig1, _>(|pm| PmConfig1 {
            battery_detection: enabled,
            ..pm
        })
    }

    /// Checks whether the battery level detector is enabled
    pub fn is_battery_detection_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PmConfig1>()?.battery_detection)
    }

    /// Sets the battery level detector threshold
    pub fn set_bld_threshold(&mut self, threshold: BldThreshold) -> Result<(), Error> {
        self.modify_register::<PmConfig1, _>(|pm| PmConfig1 {
            bld_threshold: threshold,
            ..pm
        })
    }

    /// Reads the battery level detector threshold
    pub fn bld_threshold(&mut self) -> Result<BldThreshold, Error> {
        Ok(self.read_register::<PmConfig1>()?.bld_threshold)
    }

    /// Selects how the SMPS output level is applied
    pub fn set_smps_level_mode(&mut self, mode: SmpsLevelMode) -> Result<(), Error> {
        self.modify_register::<PmConfig1, _>(|pm| PmConfig1 {
            smps_level_mode: mode,
            ..pm
        })
    }

    /// Reads the SMPS level mode
    pub fn smps_level_mode(&mut self) -> Result<SmpsLevelMode, Error> {
        Ok(self.read_register::<PmConfig1>()?.smps_level_mode)
    }

    /// Enables the FIR filter used to shape ASK/OOK transmissions
    pub fn set_fir_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PaConfig1, _>(|pa| PaConfig1 {
            fir_enabled: enabled,
            ..pa
        })
    }

    /// Checks whether the ASK/OOK FIR filter is enabled
    pub fn is_fir_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PaConfig1>()?.fir_enabled)
    }
}
