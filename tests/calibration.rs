//! Tests for the RC oscillator calibration sequence

mod common;

use common::{block_on, device, MC_STATE1};
use s2lp::{ClockFrequency, RcoCalibration};

const RCO_CALIBRATION: u8 = 0x01;
const RCO_CALIBRATOR_ERROR: u8 = 0x01;

#[test]
fn calibration_completes_when_flag_is_set() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x6D, 0x08);
    chip.chip_mut().cal_ok_after = Some(3);

    assert_eq!(device.calibrate_rco(), Ok(true));

    assert_eq!(chip.reg(0x6D), 0x08 | RCO_CALIBRATION);
    assert_eq!(chip.chip().status_reads, 3);
    assert_eq!(chip.chip().delays(), vec![20, 20]);
    assert!(device.status().rco_cal_ok);
}

#[test]
fn calibration_done_on_first_poll_does_not_wait() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);
    chip.set_reg(MC_STATE1, 0x10);

    assert_eq!(device.calibrate_rco(), Ok(true));
    assert_eq!(chip.chip().status_reads, 1);
    assert!(chip.chip().delays().is_empty());
}

#[test]
fn calibration_error_at_ceiling_reports_failure() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE1, RCO_CALIBRATOR_ERROR);

    assert_eq!(device.calibrate_rco(), Ok(false));

    assert_eq!(chip.chip().status_reads, 11);
    assert_eq!(chip.chip().delays(), vec![20; 10]);
}

#[test]
fn calibration_timeout_without_error_is_accepted() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    assert_eq!(device.calibrate_rco(), Ok(true));

    assert_eq!(chip.chip().status_reads, 11);
    assert_eq!(chip.chip().delays().len(), 10);
}

#[test]
fn calibration_honors_custom_limits() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE1, RCO_CALIBRATOR_ERROR);

    let result = device.run_rco_calibration(RcoCalibration::with_limits(2, 5));

    assert_eq!(result, Ok(false));
    assert_eq!(chip.chip().status_reads, 3);
    assert_eq!(chip.chip().delays(), vec![5, 5]);
}

#[test]
fn async_calibration_matches_blocking_sequence() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.chip_mut().cal_ok_after = Some(2);

    assert_eq!(block_on(device.calibrate_rco_async()), Ok(true));

    assert_eq!(chip.reg(0x6D) & RCO_CALIBRATION, RCO_CALIBRATION);
    assert_eq!(chip.chip().status_reads, 2);
    assert_eq!(chip.chip().delays(), vec![20]);
}
