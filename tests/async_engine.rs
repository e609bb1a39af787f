//! Tests for the asynchronous transaction engine

mod common;

use common::{block_on, device, Event, MC_STATE0, MC_STATE1};
use s2lp::registers::DeviceInfo;
use s2lp::{ClockFrequency, Error, FlushTxFifo, State};

#[test]
fn async_fifo_write_matches_blocking_framing() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    block_on(device.write_fifo_async(&[1, 2, 3])).unwrap();

    assert_eq!(chip.chip().tx_fifo, vec![1, 2, 3]);
    assert_eq!(
        chip.chip().events,
        vec![
            Event::Cs(false),
            Event::Transfer(vec![0x00, 0xFF, 1, 2, 3]),
            Event::Cs(true),
        ]
    );
}

#[test]
fn async_oversized_read_is_rejected_without_io() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    let mut buffer = [0u8; 200];

    assert_eq!(
        block_on(device.read_fifo_async(&mut buffer)),
        Err(Error::InvalidArgument)
    );
    assert!(chip.chip().events.is_empty());
}

#[test]
fn async_status_read_decodes_state() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(MC_STATE1, 0x02);
    chip.set_reg(MC_STATE0, 0x5C << 1 | 0x01);

    let status = block_on(device.read_status_async()).unwrap();

    assert_eq!(status.state, State::Tx);
    assert!(status.rx_fifo_empty);
    assert_eq!(device.status(), status);
}

#[test]
fn async_command_is_recorded() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    block_on(device.execute_command_async(FlushTxFifo)).unwrap();

    assert_eq!(chip.chip().commands, vec![0x72]);
}

#[test]
fn async_register_access_uses_typed_layout() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0xF0, 0x03);
    chip.set_reg(0xF1, 0x91);

    let info: DeviceInfo = block_on(device.read_register_async()).unwrap();

    assert_eq!(info.part_number, 0x03);
    assert_eq!(info.version, 0x91);
}

#[test]
fn async_initialize_resets_and_sets_divider() {
    let (mut device, chip) = device(ClockFrequency::Mhz52);

    block_on(device.initialize_async()).unwrap();

    let events = chip.chip().events.clone();
    assert_eq!(
        &events[..4],
        &[
            Event::Sdn(true),
            Event::Delay(2),
            Event::Sdn(false),
            Event::Delay(2),
        ]
    );
    assert_eq!(chip.reg(0x6D) & 0x08, 0x08);
}
