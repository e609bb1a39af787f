//! GPIO configuration
//!
//! Each of the four GPIO pins has its own configuration register (GPIO0_CONF
//! to GPIO3_CONF at 0x00..0x03) with the same layout:
//!
//! # Register Layout
//! - Bits 7:3: Signal select
//! - Bits 1:0: Pin mode (0 = analog, 1 = input, 2 = low power output,
//!   3 = high power output)

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::Device;
use crate::registers::InvalidValue;
use crate::Error;

const MODE_ANALOG: u8 = 0;
const MODE_INPUT: u8 = 1;
const MODE_OUTPUT_LOW_POWER: u8 = 2;
const MODE_OUTPUT_HIGH_POWER: u8 = 3;

/// GPIO pin of the S2-LP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioPin {
    Gpio0,
    Gpio1,
    Gpio2,
    Gpio3,
}

impl GpioPin {
    /// Address of the pin's configuration register
    pub const fn address(self) -> u8 {
        match self {
            Self::Gpio0 => 0x00,
            Self::Gpio1 => 0x01,
            Self::Gpio2 => 0x02,
            Self::Gpio3 => 0x03,
        }
    }
}

/// Signal driven on a GPIO configured as an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// nIRQ, active low interrupt line
    Irq = 0,
    /// Power-on reset, inverted
    PorInverted = 1,
    WakeupTimerExpired = 2,
    LowBattery = 3,
    TxDataClock = 4,
    TxState = 5,
    /// TX or RX FIFO almost empty, see PROTOCOL2
    FifoAlmostEmpty = 6,
    /// TX or RX FIFO almost full, see PROTOCOL2
    FifoAlmostFull = 7,
    RxData = 8,
    RxClock = 9,
    RxState = 10,
    NotSleepOrStandby = 11,
    Standby = 12,
    AntennaSwitch = 13,
    ValidPreamble = 14,
    SyncDetected = 15,
    RssiAboveThreshold = 16,
    McuClock = 17,
    TxOrRx = 18,
    Vdd = 19,
    Gnd = 20,
    ExternalSmps = 21,
    Sleep = 22,
    Ready = 23,
    Lock = 24,
    WaitLockDetector = 25,
    TxDataOok = 26,
    WaitReady = 27,
    WaitTimerExpiration = 28,
    CalibrationEnd = 29,
    SynthFullCircuit = 30,
}

impl TryFrom<u8> for OutputMode {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Irq,
            1 => Self::PorInverted,
            2 => Self::WakeupTimerExpired,
            3 => Self::LowBattery,
            4 => Self::TxDataClock,
            5 => Self::TxState,
            6 => Self::FifoAlmostEmpty,
            7 => Self::FifoAlmostFull,
            8 => Self::RxData,
            9 => Self::RxClock,
            10 => Self::RxState,
            11 => Self::NotSleepOrStandby,
            12 => Self::Standby,
            13 => Self::AntennaSwitch,
            14 => Self::ValidPreamble,
            15 => Self::SyncDetected,
            16 => Self::RssiAboveThreshold,
            17 => Self::McuClock,
            18 => Self::TxOrRx,
            19 => Self::Vdd,
            20 => Self::Gnd,
            21 => Self::ExternalSmps,
            22 => Self::Sleep,
            23 => Self::Ready,
            24 => Self::Lock,
            25 => Self::WaitLockDetector,
            26 => Self::TxDataOok,
            27 => Self::WaitReady,
            28 => Self::WaitTimerExpiration,
            29 => Self::CalibrationEnd,
            30 => Self::SynthFullCircuit,
            invalid => return Err(InvalidValue(invalid)),
        })
    }
}

/// Function of a GPIO configured as an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    TxCommand = 0,
    RxCommand = 1,
    /// TX data in direct GPIO mode
    TxData = 2,
    Wakeup = 3,
    /// External 34.7 kHz clock for low duty cycle mode
    ExternalLdcClock = 4,
}

impl TryFrom<u8> for InputMode {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::TxCommand,
            1 => Self::RxCommand,
            2 => Self::TxData,
            3 => Self::Wakeup,
            4 => Self::ExternalLdcClock,
            invalid => return Err(InvalidValue(invalid)),
        })
    }
}

/// Configuration of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinConfig {
    Analog,
    Input(InputMode),
    Output { signal: OutputMode, high_power: bool },
}

impl PinConfig {
    /// Value of the GPIOx_CONF register
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Analog => MODE_ANALOG,
            Self::Input(mode) => (mode as u8) << 3 | MODE_INPUT,
            Self::Output { signal, high_power } => {
                let mode = if high_power {
                    MODE_OUTPUT_HIGH_POWER
                } else {
                    MODE_OUTPUT_LOW_POWER
                };
                (signal as u8) << 3 | mode
            }
        }
    }

    /// Decodes a GPIOx_CONF register value
    pub fn from_byte(value: u8) -> Result<Self, InvalidValue> {
        let signal = value >> 3;
        match value & 0x03 {
            MODE_ANALOG => Ok(Self::Analog),
            MODE_INPUT => Ok(Self::Input(InputMode::try_from(signal)?)),
            mode => Ok(Self::Output {
                signal: OutputMode::try_from(signal)?,
                high_power: mode == MODE_OUTPUT_HIGH_POWER,
            }),
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
    /// Configures a GPIO pin
    ///
    /// # Example
    /// ```ignore
    /// use s2lp::radio::{GpioPin, OutputMode, PinConfig};
    ///
    /// device.set_gpio(
    ///     GpioPin::Gpio0,
    ///     PinConfig::Output { signal: OutputMode::Irq, high_power: false },
    /// )?;
    /// ```
    pub fn set_gpio(&mut self, pin: GpioPin, config: PinConfig) -> Result<(), Error> {
        self.write_raw_register(pin.address(), config.to_byte())
    }

    /// Reads the configuration of a GPIO pin
    ///
    /// # Errors
    /// * `Error::Deserialization` - The signal select holds an undefined code
    pub fn gpio(&mut self, pin: GpioPin) -> Result<PinConfig, Error> {
        let value = self.read_raw_register(pin.address())?;
        PinConfig::from_byte(value).map_err(|_| Error::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_config_layout() {
        let config = PinConfig::Output {
            signal: OutputMode::Irq,
            high_power: false,
        };
        assert_eq!(config.to_byte(), 0x02);

        let config = PinConfig::Output {
            signal: OutputMode::SyncDetected,
            high_power: true,
        };
        assert_eq!(config.to_byte(), 0x7B);
        assert_eq!(PinConfig::from_byte(0x7B), Ok(config));
    }

    #[test]
    fn input_config_layout() {
        let config = PinConfig::Input(InputMode::ExternalLdcClock);
        assert_eq!(config.to_byte(), 0x21);
        assert_eq!(PinConfig::from_byte(0x21), Ok(config));
    }

    #[test]
    fn analog_ignores_signal_bits() {
        assert_eq!(PinConfig::from_byte(0xF8), Ok(PinConfig::Analog));
    }

    #[test]
    fn undefined_signal_is_rejected() {
        assert_eq!(PinConfig::from_byte(0xFA), Err(InvalidValue(31)));
        assert_eq!(PinConfig::from_byte(0x29), Err(InvalidValue(5)));
    }
}
