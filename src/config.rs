//! Static configuration of the radio
//!
//! The S2-LP is clocked from an external crystal. The crystal frequency is
//! fixed by the board design and must be supplied when the [`Device`](crate::Device)
//! is created, as every RF conversion depends on it.

/// Maximum number of payload bytes moved by a single SPI transaction.
///
/// This is also the depth of the TX and RX FIFOs.
pub const MAX_PAYLOAD: usize = 128;

/// Number of status polls after the first one before RCO calibration gives up
pub const RCO_CALIBRATION_TRIES: u8 = 10;

/// Delay between two RCO calibration status polls, in milliseconds
pub const RCO_CALIBRATION_WAIT_MS: u32 = 20;

/// Time the shutdown line is held in each state during a reset, in milliseconds
pub const RESET_DELAY_MS: u32 = 2;

/// Crystal oscillator frequencies supported by the S2-LP
///
/// The 48, 50 and 52 MHz crystals feed the digital domain through a divide
/// by two, and require the reference divider to be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockFrequency {
    /// 24 MHz crystal
    Mhz24,
    /// 25 MHz crystal
    Mhz25,
    /// 26 MHz crystal
    Mhz26,
    /// 48 MHz crystal
    Mhz48,
    /// 50 MHz crystal
    Mhz50,
    /// 52 MHz crystal
    Mhz52,
}

impl ClockFrequency {
    /// Crystal frequency in Hz
    pub const fn hz(self) -> u32 {
        match self {
            Self::Mhz24 => 24_000_000,
            Self::Mhz25 => 25_000_000,
            Self::Mhz26 => 26_000_000,
            Self::Mhz48 => 48_000_000,
            Self::Mhz50 => 50_000_000,
            Self::Mhz52 => 52_000_000,
        }
    }

    /// Returns true when the digital clock runs at half the crystal frequency
    pub const fn is_divided(self) -> bool {
        matches!(self, Self::Mhz48 | Self::Mhz50 | Self::Mhz52)
    }

    /// Digital clock frequency in Hz
    pub const fn digital_hz(self) -> u32 {
        if self.is_divided() {
            self.hz() / 2
        } else {
            self.hz()
        }
    }
}

impl TryFrom<u32> for ClockFrequency {
    type Error = crate::Error;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        match hz {
            24_000_000 => Ok(Self::Mhz24),
            25_000_000 => Ok(Self::Mhz25),
            26_000_000 => Ok(Self::Mhz26),
            48_000_000 => Ok(Self::Mhz48),
            50_000_000 => Ok(Self::Mhz50),
            52_000_000 => Ok(Self::Mhz52),
            _ => Err(crate::Error::InvalidArgument),
        }
    }
}
