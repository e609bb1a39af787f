//! RC oscillator calibration
//!
//! The RCO provides the low frequency clock used by the wake-up timer in
//! low duty cycle mode. Its calibration is started by setting the RCO
//! calibration bit in XO_RCO_CONF0 and reports completion and errors through
//! the status bytes.
//!
//! [`RcoCalibration`] holds the polling logic as a pure state machine, so it
//! can be driven by the blocking and the async device methods alike, or by an
//! application that wants to interleave other work with the polling.
//!
//! # Important Notes
//! - If the poll ceiling is reached without the completion flag, the
//!   calibration is only reported as failed when the calibrator error flag is
//!   set in the last status. A calibration that simply did not finish in time
//!   is reported as successful.

use crate::commands::Status;
use crate::config::{RCO_CALIBRATION_TRIES, RCO_CALIBRATION_WAIT_MS};
use crate::device::Device;
use crate::registers::XoRcoConfig0;
use crate::Error;

/// Calibration progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// Not started
    Idle,
    /// Waiting for the completion flag
    Calibrating {
        /// Number of polls after the first one
        tries: u8,
    },
    /// Calibration finished
    Done,
    /// Calibration reported an error
    Failed,
}

impl CalibrationState {
    /// Returns true for `Done` and `Failed`
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Action requested by the state machine after a status observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Wait this many milliseconds, then read the status again
    Wait(u32),
    /// The calibration is over
    Finished(CalibrationState),
}

/// RCO calibration state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RcoCalibration {
    state: CalibrationState,
    max_tries: u8,
    wait_ms: u32,
}

impl Default for RcoCalibration {
    fn default() -> Self {
        Self::new()
    }
}

impl RcoCalibration {
    /// Creates an idle calibration with the default poll ceiling and interval
    pub const fn new() -> Self {
        Self::with_limits(RCO_CALIBRATION_TRIES, RCO_CALIBRATION_WAIT_MS)
    }

    /// Creates an idle calibration polling at most `max_tries` extra times,
    /// `wait_ms` apart
    pub const fn with_limits(max_tries: u8, wait_ms: u32) -> Self {
        Self {
            state: CalibrationState::Idle,
            max_tries,
            wait_ms,
        }
    }

    /// Current state
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Marks the calibration as started.
    ///
    /// Must be called once the calibration bit has been written.
    pub fn start(&mut self) {
        self.state = CalibrationState::Calibrating { tries: 0 };
    }

    /// Feeds a freshly read status into the state machine.
    ///
    /// Observing a status while idle or finished leaves the state unchanged.
    pub fn observe(&mut self, status: &Status) -> Step {
        let tries = match self.state {
            CalibrationState::Calibrating { tries } => tries,
            other => return Step::Finished(other),
        };

        if status.rco_cal_ok {
            self.state = CalibrationState::Done;
        } else if tries >= self.max_tries {
            self.state = if status.rco_calibrator_error {
                CalibrationState::Failed
            } else {
                CalibrationState::Done
            };
        } else {
            self.state = CalibrationState::Calibrating { tries: tries + 1 };
            return Step::Wait(self.wait_ms);
        }

        Step::Finished(self.state)
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: embedded_hal::spi::SpiBus,
    CS: embedded_hal::digital::OutputPin,
    SDN: embedded_hal::digital::OutputPin,
    D: embedded_hal::delay::DelayNs,
{
    /// Calibrates the RC oscillator.
    ///
    /// # Returns
    /// * `Ok(true)` - Calibration completed, or timed out without an error flag
    /// * `Ok(false)` - The calibrator reported an error
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn calibrate_rco(&mut self) -> Result<bool, Error> {
        self.run_rco_calibration(RcoCalibration::new())
    }

    /// Runs a calibration with custom poll limits
    pub fn run_rco_calibration(&mut self, mut calibration: RcoCalibration) -> Result<bool, Error> {
        self.modify_register::<XoRcoConfig0, _>(|conf| XoRcoConfig0 {
            rco_calibration: true,
            ..conf
        })?;
        calibration.start();

        #[cfg(feature = "defmt")]
        defmt::debug!("RCO calibration started");

        loop {
            let status = self.read_status()?;
            match calibration.observe(&status) {
                Step::Wait(ms) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("RCO calibration pending, state {}", calibration.state());

                    self.delay_ms(ms);
                }
                Step::Finished(state) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("RCO calibration finished: {}", state);

                    return Ok(state == CalibrationState::Done);
                }
            }
        }
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: embedded_hal_async::spi::SpiBus,
    CS: embedded_hal::digital::OutputPin,
    SDN: embedded_hal::digital::OutputPin,
    D: embedded_hal_async::delay::DelayNs,
{
    /// Asynchronously calibrates the RC oscillator.
    ///
    /// This is the async version of [`calibrate_rco`](Device::calibrate_rco).
    pub async fn calibrate_rco_async(&mut self) -> Result<bool, Error> {
        self.run_rco_calibration_async(RcoCalibration::new()).await
    }

    /// This is the async version of [`run_rco_calibration`](Device::run_rco_calibration).
    pub async fn run_rco_calibration_async(
        &mut self,
        mut calibration: RcoCalibration,
    ) -> Result<bool, Error> {
        self.modify_register_async::<XoRcoConfig0, _>(|conf| XoRcoConfig0 {
            rco_calibration: true,
            ..conf
        })
        .await?;
        calibration.start();

        #[cfg(feature = "defmt")]
        defmt::debug!("RCO calibration started");

        loop {
            let status = self.read_status_async().await?;
            match calibration.observe(&status) {
                Step::Wait(ms) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("RCO calibration pending, state {}", calibration.state());

                    self.delay_ms_async(ms).await;
                }
                Step::Finished(state) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("RCO calibration finished: {}", state);

                    return Ok(state == CalibrationState::Done);
                }
            }
        }
    }
}
