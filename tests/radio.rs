//! Tests for the feature level radio accessors
//!
//! Each accessor is checked against the register bytes it leaves behind on
//! the simulated chip.

mod common;

use common::device;
use s2lp::radio::{ChargePumpCurrent, DataCoding, GpioPin, InputMode, OutputMode, PinConfig};
use s2lp::{
    ClockFrequency, CrcMode, Error, Interrupts, Modulation, PacketFormat, RxSource, SleepMode,
    SmpsVoltage, SynthBand, SYNTH_WORD_MASK,
};

// ============================================================================
// Synthesizer and modem
// ============================================================================

#[test]
fn base_frequency_keeps_charge_pump_bits() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    device.initialize().unwrap();
    chip.set_reg(0x05, 0x40);

    device.set_base_frequency(868_000_000).unwrap();

    assert_eq!(chip.reg(0x05) & 0xF0, 0x40);
    assert_eq!(device.synth_band().unwrap(), SynthBand::High);
    let back = device.base_frequency().unwrap();
    assert!(back.abs_diff(868_000_000) <= 12, "came back as {back}");
}

#[test]
fn synth_word_above_field_is_rejected() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    assert_eq!(device.set_synth_word(0x1000_0000), Err(Error::InvalidArgument));
    assert!(chip.chip().events.is_empty());

    device.set_synth_word(0x0FFF_FFFF).unwrap();
    assert_eq!(device.synth_word().unwrap(), 0x0FFF_FFFF);
}

#[test]
fn frequency_beyond_u32_is_not_representable() {
    let (mut device, _chip) = device(ClockFrequency::Mhz48);
    device.set_synth_word(SYNTH_WORD_MASK).unwrap();

    assert_eq!(device.base_frequency(), Err(Error::NotRepresentable));
    assert_eq!(device.center_frequency(), Err(Error::NotRepresentable));

    device.set_ref_div_enabled(true).unwrap();
    device.set_synth_band(SynthBand::Mid).unwrap();
    let base = device.base_frequency().unwrap();
    assert!(base.abs_diff(1_536_000_000) <= 6, "came back as {base}");
}

#[test]
fn charge_pump_current_spans_two_registers() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.set_charge_pump_current(ChargePumpCurrent::Ua240).unwrap();

    assert_eq!(chip.reg(0x05) >> 5, 0b010);
    assert_eq!(chip.reg(0x65) & 0x04, 0x04);
    assert_eq!(
        device.charge_pump_current().unwrap(),
        ChargePumpCurrent::Ua240
    );
}

#[test]
fn undefined_charge_pump_combination_fails_to_decode() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x05, 0b111 << 5);

    assert_eq!(device.charge_pump_current(), Err(Error::Deserialization));
}

#[test]
fn data_rate_keeps_modulation() {
    let (mut device, _chip) = device(ClockFrequency::Mhz26);

    device.set_modulation(Modulation::Gfsk2).unwrap();
    device.set_data_rate(38_400).unwrap();

    assert_eq!(device.modulation().unwrap(), Modulation::Gfsk2);
    assert_eq!(device.data_rate_raw().unwrap().1, 7);
    let back = device.data_rate().unwrap();
    assert!(back.abs_diff(38_400) <= 1, "came back as {back}");
}

#[test]
fn modulation_can_replace_undefined_code() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);
    chip.set_reg(0x0E, 0x12);
    chip.set_reg(0x0F, 0x34);
    chip.set_reg(0x10, 0x47);

    assert_eq!(device.modulation(), Err(Error::Deserialization));
    assert_eq!(device.data_rate_raw().unwrap(), (0x1234, 7));

    device.set_modulation(Modulation::Gfsk2).unwrap();

    assert_eq!(chip.reg(0x10), 0x27);
    assert_eq!(device.modulation().unwrap(), Modulation::Gfsk2);
}

#[test]
fn data_rate_is_written_over_undefined_modulation() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);
    chip.set_reg(0x10, 0x47);

    device.set_data_rate_raw(0x1000, 5).unwrap();

    assert_eq!([chip.reg(0x0E), chip.reg(0x0F), chip.reg(0x10)], [0x10, 0x00, 0x45]);
}

#[test]
fn data_rate_exponent_is_range_checked() {
    let (mut device, chip) = device(ClockFrequency::Mhz26);

    assert_eq!(device.set_data_rate_raw(0, 16), Err(Error::InvalidArgument));
    assert!(chip.chip().events.is_empty());
}

#[test]
fn channel_settings_give_center_frequency() {
    let (mut device, _chip) = device(ClockFrequency::Mhz50);
    device.initialize().unwrap();
    device.set_base_frequency(868_000_000).unwrap();
    device.set_channel_spacing(10).unwrap();
    device.set_channel_number(3).unwrap();

    let base = device.base_frequency().unwrap();
    let center = device.center_frequency().unwrap();

    // 50 MHz / 2^15 * 10 * 3
    assert!((center - base).abs_diff(45_776) <= 1);
}

// ============================================================================
// Transmitter
// ============================================================================

#[test]
fn static_power_fills_ramp_and_disables_ramping() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x62, 0x20);

    device.set_static_power_level(10).unwrap();

    for address in 0x5A..0x62 {
        assert_eq!(chip.reg(address), 10);
    }
    assert_eq!(chip.reg(0x62), 0x07);
    assert!(!device.is_ramping_enabled().unwrap());
}

#[test]
fn power_level_is_range_checked() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    assert_eq!(device.set_static_power_level(128), Err(Error::InvalidArgument));
    assert!(chip.chip().events.is_empty());
}

// ============================================================================
// Packet handler
// ============================================================================

#[test]
fn data_coding_is_exclusive() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.set_data_coding(DataCoding::Manchester).unwrap();
    assert_eq!(chip.reg(0x2F) & 0x06, 0x02);

    device.set_data_coding(DataCoding::Fec).unwrap();
    assert_eq!(chip.reg(0x2F) & 0x06, 0x00);
    assert_eq!(chip.reg(0x30) & 0x01, 0x01);
    assert_eq!(device.data_coding().unwrap(), DataCoding::Fec);

    device.set_data_coding(DataCoding::None).unwrap();
    assert_eq!(device.data_coding().unwrap(), DataCoding::None);
}

#[test]
fn data_coding_prefers_three_of_six() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x2F, 0x06);
    chip.set_reg(0x30, 0x01);

    assert_eq!(device.data_coding().unwrap(), DataCoding::ThreeOfSix);

    chip.set_reg(0x2F, 0x02);
    assert_eq!(device.data_coding().unwrap(), DataCoding::Manchester);
}

#[test]
fn preamble_length_keeps_sync_length() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x2B, 32 << 2);

    assert_eq!(device.set_preamble_length(1024), Err(Error::InvalidArgument));
    assert!(chip.chip().events.is_empty());

    device.set_preamble_length(1023).unwrap();
    assert_eq!(chip.reg(0x2B), 32 << 2 | 0x03);
    assert_eq!(chip.reg(0x2C), 0xFF);
    assert_eq!(device.sync_length().unwrap(), 32);
}

#[test]
fn packet_control_fields_survive_reserved_codes() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x30, 0xE0);
    chip.set_reg(0x2E, 0x30);

    device.set_whitening(true).unwrap();
    device.set_data_coding(DataCoding::Fec).unwrap();
    assert_eq!(chip.reg(0x30), 0xF1);
    assert_eq!(device.crc_mode(), Err(Error::Deserialization));

    device.set_crc_mode(CrcMode::Poly1021).unwrap();
    assert_eq!(device.crc_mode().unwrap(), CrcMode::Poly1021);

    device.set_packet_format(PacketFormat::Uart).unwrap();
    assert_eq!(chip.reg(0x2E), 0xB0);
    assert_eq!(device.rx_source(), Err(Error::Deserialization));

    device.set_rx_source(RxSource::Normal).unwrap();
    assert_eq!(chip.reg(0x2E), 0x80);
}

// ============================================================================
// Receiver
// ============================================================================

#[test]
fn agc_hold_time_is_range_checked() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x1E, 0x80);

    assert_eq!(device.set_agc_hold_time_raw(32), Err(Error::InvalidArgument));
    device.set_agc_hold_time_raw(31).unwrap();

    assert_eq!(chip.reg(0x1E), 0x80 | 31);
    assert!(device.is_agc_enabled().unwrap());
}

#[test]
fn rx_fifo_thresholds_are_independent() {
    let (mut device, _chip) = device(ClockFrequency::Mhz50);

    device.set_rx_fifo_almost_full_threshold(100).unwrap();
    device.set_rx_fifo_almost_empty_threshold(20).unwrap();

    assert_eq!(device.rx_fifo_almost_full_threshold().unwrap(), 100);
    assert_eq!(device.rx_fifo_almost_empty_threshold().unwrap(), 20);
    assert_eq!(
        device.set_rx_fifo_almost_full_threshold(128),
        Err(Error::InvalidArgument)
    );
}

// ============================================================================
// GPIO
// ============================================================================

#[test]
fn gpio_configuration_is_written_to_pin_register() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    let irq = PinConfig::Output {
        signal: OutputMode::Irq,
        high_power: false,
    };

    device.set_gpio(GpioPin::Gpio2, irq).unwrap();
    device
        .set_gpio(GpioPin::Gpio1, PinConfig::Input(InputMode::Wakeup))
        .unwrap();

    assert_eq!(chip.reg(0x02), 0x02);
    assert_eq!(chip.reg(0x01), 0x19);
    assert_eq!(device.gpio(GpioPin::Gpio2).unwrap(), irq);
}

#[test]
fn undefined_gpio_signal_fails_to_decode() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0x03, 0xFA);

    assert_eq!(device.gpio(GpioPin::Gpio3), Err(Error::Deserialization));
}

// ============================================================================
// Interrupts
// ============================================================================

#[test]
fn interrupts_are_cleared_on_request() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);
    chip.set_reg(0xFD, 0x05);

    let pending = device.interrupts(false).unwrap();
    assert_eq!(pending, Interrupts::RX_DATA_READY | Interrupts::TX_DATA_SENT);
    assert_eq!(chip.reg(0xFD), 0x05);

    let pending = device.interrupts(true).unwrap();
    assert_eq!(pending, Interrupts::RX_DATA_READY | Interrupts::TX_DATA_SENT);
    assert_eq!(chip.reg(0xFD), 0x00);
}

#[test]
fn interrupt_mask_is_big_endian() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device
        .set_interrupt_mask(Interrupts::RX_DATA_READY | Interrupts::READY)
        .unwrap();

    assert_eq!(
        [chip.reg(0x50), chip.reg(0x51), chip.reg(0x52), chip.reg(0x53)],
        [0x00, 0x01, 0x00, 0x01]
    );
    assert_eq!(
        device.interrupt_mask().unwrap(),
        Interrupts::RX_DATA_READY | Interrupts::READY
    );
}

// ============================================================================
// Power management
// ============================================================================

#[test]
fn internal_smps_clears_external_supply_bit() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.set_internal_smps(false).unwrap();
    assert_eq!(chip.reg(0x75) & 0x20, 0x20);

    device.set_internal_smps(true).unwrap();
    assert_eq!(chip.reg(0x75) & 0x20, 0x00);
    assert!(device.is_internal_smps_enabled().unwrap());
}

#[test]
fn sleep_mode_is_written_over_reserved_smps_code() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    device.set_sleep_mode(SleepMode::B).unwrap();
    assert_eq!(chip.reg(0x79), 0x01);
    assert_eq!(device.smps_voltage(), Err(Error::Deserialization));

    device.set_smps_voltage(SmpsVoltage::V1_2).unwrap();
    assert_eq!(chip.reg(0x79), 0x11);
    assert_eq!(device.sleep_mode().unwrap(), SleepMode::B);
}

#[test]
fn krm_ratio_keeps_enable_bit() {
    let (mut device, chip) = device(ClockFrequency::Mhz50);

    assert_eq!(device.set_krm_ratio(0x8000), Err(Error::InvalidArgument));

    device.set_krm_enabled(true).unwrap();
    device.set_krm_ratio(0x1234).unwrap();
    assert_eq!([chip.reg(0x76), chip.reg(0x77)], [0x92, 0x34]);
    assert!(device.is_krm_enabled().unwrap());
}
