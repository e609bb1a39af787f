#![no_std]
//! S2-LP Radio Driver
//!
//! This crate provides a type-safe interface for the ST S2-LP sub-GHz radio transceiver.
//! The S2-LP is an ultra low power narrow band transceiver designed for use in the
//! 413-527 MHz and 826-1055 MHz ISM and SRD bands.
//!
//! # Features
//! - Modulation support: 2(G)FSK, 4(G)FSK, ASK/OOK
//! - Data rate: 0.1 to 500 kbps
//! - Output power up to +16 dBm
//! - 128 byte TX and RX FIFOs
//! - Packet handler with CRC, whitening, FEC and Manchester/3-out-of-6 coding
//! - Four programmable GPIO pins
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface for hardware interaction
//!   - Frames every SPI transaction and tracks the status returned with it
//!   - Provides typed register access, FIFO access and command execution
//!
//! - [`codec`]: Conversions between physical RF quantities and their register
//!   encodings (synthesizer word, data rate, frequency deviation, channel filter)
//!
//! - [`calibration`]: RC oscillator calibration state machine
//!
//! - [`radio`]: Feature level accessors on [`Device`] for RF, RX, TX, packet,
//!   GPIO, power and interrupt settings
//!
//! - [`registers`]: Register definitions for direct hardware access
//!
//! - [`commands`]: Command strobes and device status
//!
//! # Usage
//! The driver uses the `regiface` crate to provide a type-safe interface
//! for register access and command execution. The main entry point is the
//! [`Device`] struct which owns the SPI bus, the chip select and shutdown lines
//! and a delay provider.
//!
//! Configuration follows a specific sequence:
//!
//! 1. Create a new [`Device`] with the crystal frequency of the board
//! 2. Call [`Device::initialize`] to reset the chip and set the reference divider
//! 3. Configure the synthesizer band and base frequency
//! 4. Configure modulation, data rate and frequency deviation
//! 5. Configure the packet handler
//! 6. Set up GPIOs and interrupts
//! 7. Issue a TX or RX command
//!
//! # Important Notes
//! - Configuration should be done in READY or STANDBY
//! - The crystal frequency cannot be detected and must match the board
//! - No transaction moves more than 128 bytes, the size of the FIFOs
//!
//! # Example
//! ```ignore
//! use s2lp::{ClockFrequency, Device, Error, commands::GoReady, registers::Modulation};
//!
//! fn configure_radio(spi: SPI, cs: CS, sdn: SDN, delay: D) -> Result<(), Error> {
//!     let mut device = Device::new(spi, cs, sdn, delay, ClockFrequency::Mhz50);
//!     device.initialize()?;
//!     device.execute_command(GoReady)?;
//!
//!     device.set_base_frequency(868_000_000)?;
//!     device.set_modulation(Modulation::Gfsk2)?;
//!     device.set_data_rate(38_400)?;
//!     device.set_frequency_deviation(20_000)?;
//!
//!     Ok(())
//! }
//! ```

use regiface::*;

pub mod calibration;
pub mod codec;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod radio;
pub mod registers;

pub use calibration::{CalibrationState, RcoCalibration, Step};
pub use codec::Codec;
pub use commands::*;
pub use config::ClockFrequency;
pub use device::Device;
pub use error::Error;
pub use registers::*;
