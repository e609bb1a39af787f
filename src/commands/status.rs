//! Device status
//!
//! The S2-LP returns two status bytes at the start of every SPI transaction.
//! The same information is mirrored in the MC_STATE1 and MC_STATE0 registers,
//! which allows the status to be refreshed without issuing any other access.
//!
//! The byte order is reversed between the two sources: the first byte on the
//! wire is MC_STATE1 and the second one is MC_STATE0. [`Status::from_raw`]
//! always takes them in register order.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

/// Main state machine state
///
/// Extracted from MC_STATE0 bits 7:1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// READY: crystal running, waiting for a command
    Ready,
    /// SLEEP without FIFO retention
    SleepA,
    /// STANDBY: lowest power state with fast wake-up
    Standby,
    /// SLEEP with FIFO retention
    SleepB,
    /// LOCK: synthesizer locked
    Lock,
    /// RX
    Rx,
    /// Synthesizer setting up before a lock
    SynthSetup,
    /// TX
    Tx,
    /// A transient state with no dedicated variant
    Other(u8),
}

impl State {
    /// Raw 7-bit state code
    pub fn code(self) -> u8 {
        match self {
            Self::Ready => 0x00,
            Self::SleepA => 0x01,
            Self::Standby => 0x02,
            Self::SleepB => 0x03,
            Self::Lock => 0x0C,
            Self::Rx => 0x30,
            Self::SynthSetup => 0x50,
            Self::Tx => 0x5C,
            Self::Other(code) => code,
        }
    }
}

impl From<u8> for State {
    fn from(code: u8) -> Self {
        match code & 0x7F {
            0x00 => Self::Ready,
            0x01 => Self::SleepA,
            0x02 => Self::Standby,
            0x03 => Self::SleepB,
            0x0C => Self::Lock,
            0x30 => Self::Rx,
            0x50 => Self::SynthSetup,
            0x5C => Self::Tx,
            other => Self::Other(other),
        }
    }
}

/// Device status (address: 0x8D)
///
/// Covers MC_STATE1 and MC_STATE0.
///
/// # Status Format
/// MC_STATE0:
/// - Bits 7:1: State
/// - Bit 0: XO on
///
/// MC_STATE1:
/// - Bit 4: RCO calibration completed
/// - Bit 3: Antenna selected
/// - Bit 2: TX FIFO full
/// - Bit 1: RX FIFO empty
/// - Bit 0: RCO calibrator error
#[register(0x8Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Crystal oscillator is running
    pub xo_on: bool,
    /// Current state of the main state machine
    pub state: State,
    /// The RCO calibrator reported an error
    pub rco_calibrator_error: bool,
    /// RX FIFO is empty
    pub rx_fifo_empty: bool,
    /// TX FIFO is full
    pub tx_fifo_full: bool,
    /// Currently selected antenna (0 or 1)
    pub ant_sel: u8,
    /// RCO calibration has completed successfully
    pub rco_cal_ok: bool,
}

impl Status {
    /// Decodes a status from the MC_STATE0 and MC_STATE1 values
    pub fn from_raw(state0: u8, state1: u8) -> Self {
        Self {
            xo_on: state0 & 0x01 != 0,
            state: State::from(state0 >> 1),
            rco_calibrator_error: state1 & 0x01 != 0,
            rx_fifo_empty: state1 & 0x02 != 0,
            tx_fifo_full: state1 & 0x04 != 0,
            ant_sel: (state1 >> 3) & 0x01,
            rco_cal_ok: state1 & 0x10 != 0,
        }
    }
}

impl FromByteArray for Status {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self::from_raw(bytes[1], bytes[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_status_bytes() {
        let status = Status::from_raw(0b0000_0011, 0b0001_0110);

        assert!(status.xo_on);
        assert_eq!(status.state, State::SleepA);
        assert!(!status.rco_calibrator_error);
        assert!(status.rx_fifo_empty);
        assert!(status.tx_fifo_full);
        assert_eq!(status.ant_sel, 0);
        assert!(status.rco_cal_ok);
    }

    #[test]
    fn register_bytes_are_in_mc_state1_order() {
        let status = Status::from_bytes([0x01, 0x5C << 1]).unwrap();
        assert_eq!(status.state, State::Tx);
        assert!(status.rco_calibrator_error);
        assert!(!status.xo_on);
    }

    #[test]
    fn unknown_state_codes_are_preserved() {
        let state = State::from(0x42);
        assert_eq!(state, State::Other(0x42));
        assert_eq!(state.code(), 0x42);
        assert_eq!(State::from(State::Lock.code()), State::Lock);
    }
}
