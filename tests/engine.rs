//! Tests for the SPI transaction engine
//!
//! Framing, status capture, payload limits and the reset sequence.

mod common;

use common::{device, Event, FIFO, MC_STATE0, MC_STATE1};
use s2lp::{ClockFrequency, Error, GoReady, State};

// ============================================================================
// Framing
// ============================================================================

#[test]
fn register_write_is_framed_with_header() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.write_raw_register(0x0A, 0x55).unwrap();

    assert_eq!(chip.reg(0x0A), 0x55);
    assert_eq!(
        chip.chip().events,
        vec![
            Event::Cs(false),
            Event::Transfer(vec![0x00, 0x0A, 0x55]),
            Event::Cs(true),
        ]
    );
}

#[test]
fn batch_read_uses_one_transaction() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    for (i, value) in [0x11, 0x22, 0x33, 0x44].into_iter().enumerate() {
        chip.set_reg(0x04 + i as u8, value);
    }

    let mut values = [0u8; 4];
    device.batch_read_registers(0x04, &mut values).unwrap();

    assert_eq!(values, [0x11, 0x22, 0x33, 0x44]);
    assert_eq!(chip.chip().transfers(), vec![vec![0x01, 0x04, 0, 0, 0, 0]]);
    assert_eq!(&device.rx_payload()[..4], &values);
}

#[test]
fn batch_write_covers_consecutive_registers() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.batch_write_registers(0x5A, &[1, 2, 3]).unwrap();

    assert_eq!([chip.reg(0x5A), chip.reg(0x5B), chip.reg(0x5C)], [1, 2, 3]);
    assert_eq!(chip.chip().transfers(), vec![vec![0x00, 0x5A, 1, 2, 3]]);
}

#[test]
fn command_strobe_is_sent_alone() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE0, 0x02 << 1 | 0x01);

    let status = device.execute_command(GoReady).unwrap();

    assert_eq!(chip.chip().commands, vec![0x62]);
    assert_eq!(chip.chip().transfers(), vec![vec![0x80, 0x62]]);
    assert_eq!(status.state, State::Standby);
    assert!(status.xo_on);
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn status_is_captured_from_every_transaction() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE1, 0b0001_0110);
    chip.set_reg(MC_STATE0, 0b0000_0011);

    device.write_raw_register(0x0A, 0x55).unwrap();

    assert_eq!(device.raw_status(), [0x03, 0x16]);
    let status = device.status();
    assert!(status.xo_on);
    assert_eq!(status.state, State::SleepA);
    assert!(!status.rco_calibrator_error);
    assert!(status.rx_fifo_empty);
    assert!(status.tx_fifo_full);
    assert_eq!(status.ant_sel, 0);
    assert!(status.rco_cal_ok);
}

#[test]
fn status_without_io_reports_last_capture() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    assert_eq!(device.raw_status(), [0, 0]);

    chip.set_reg(MC_STATE0, 0x30 << 1);
    device.read_raw_register(0x00).unwrap();
    chip.set_reg(MC_STATE0, 0x5C << 1);

    assert_eq!(device.status().state, State::Rx);
}

#[test]
fn read_status_decodes_state_registers() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE1, 0b0000_1001);
    chip.set_reg(MC_STATE0, 0x0C << 1 | 0x01);

    let status = device.read_status().unwrap();

    assert_eq!(status.state, State::Lock);
    assert!(status.xo_on);
    assert!(status.rco_calibrator_error);
    assert_eq!(status.ant_sel, 1);
    assert!(!status.rco_cal_ok);
    assert_eq!(chip.chip().transfers(), vec![vec![0x01, MC_STATE1, 0, 0]]);
}

#[test]
fn device_info_is_read_from_chip() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0xF0, 0x03);
    chip.set_reg(0xF1, 0xC1);

    assert_eq!(device.part_number().unwrap(), 0x03);
    assert_eq!(device.version_number().unwrap(), 0xC1);
}

// ============================================================================
// FIFO
// ============================================================================

#[test]
fn full_fifo_write_fits_one_transaction() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    let data: Vec<u8> = (0..128).collect();

    device.write_fifo(&data).unwrap();

    assert_eq!(chip.chip().tx_fifo, data);
    let transfers = chip.chip().transfers();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].len(), 130);
    assert_eq!(&transfers[0][..2], &[0x00, FIFO]);
}

#[test]
fn oversized_fifo_write_is_rejected_without_io() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    assert_eq!(device.write_fifo(&[0xAA; 130]), Err(Error::InvalidArgument));

    assert!(chip.chip().events.is_empty());
    assert!(chip.chip().tx_fifo.is_empty());
}

#[test]
fn oversized_fifo_read_is_rejected_without_io() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    let mut buffer = [0u8; 129];

    assert_eq!(device.read_fifo(&mut buffer), Err(Error::InvalidArgument));
    assert!(chip.chip().events.is_empty());
}

#[test]
fn fifo_read_drains_rx_fifo() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.chip_mut().rx_fifo.extend([0xDE, 0xAD, 0xBE, 0xEF]);

    let mut buffer = [0u8; 3];
    device.read_fifo(&mut buffer).unwrap();

    assert_eq!(buffer, [0xDE, 0xAD, 0xBE]);
    assert_eq!(chip.chip().rx_fifo.len(), 1);
}

#[test]
fn low_level_write_sends_staged_payload() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    device.tx_payload_mut()[..2].copy_from_slice(&[0x12, 0x34]);

    device.select().unwrap();
    device.write(0x05, 2).unwrap();
    device.deselect().unwrap();

    assert_eq!([chip.reg(0x05), chip.reg(0x06)], [0x12, 0x34]);
    assert_eq!(device.write(0x05, 129), Err(Error::InvalidArgument));
    assert_eq!(device.read(0x05, 129), Err(Error::InvalidArgument));
}

// ============================================================================
// Reset and initialization
// ============================================================================

#[test]
fn reset_toggles_shutdown_line() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);

    device.reset().unwrap();

    assert_eq!(
        chip.chip().events,
        vec![
            Event::Sdn(true),
            Event::Delay(2),
            Event::Sdn(false),
            Event::Delay(2),
        ]
    );
}

#[test]
fn initialize_enables_reference_divider_for_fast_crystal() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x6D, 0xA0);

    device.initialize().unwrap();

    assert_eq!(chip.reg(0x6D), 0xA8);
    assert!(device.is_ref_div_enabled().unwrap());
    assert_eq!(device.digital_clock_frequency(), 25_000_000);
}

#[test]
fn initialize_clears_reference_divider_for_slow_crystal() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);
    chip.set_reg(0x6D, 0x08);

    device.initialize().unwrap();

    assert_eq!(chip.reg(0x6D), 0x00);
    assert!(!device.is_digital_clock_divided());
}
