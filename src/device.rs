//! S2-LP Radio Device Interface
//!
//! This module provides the transaction engine used to talk to the S2-LP over SPI.
//! It supports both synchronous and asynchronous operations.
//!
//! The interface is built around the `Device<SPI, CS, SDN, D>` struct which owns an
//! SPI bus, the chip select and shutdown lines and a delay provider, and provides
//! methods for:
//! - Reading and writing device registers
//! - Reading and writing the FIFO
//! - Executing command strobes
//! - Tracking the device status returned with every transaction
//!
//! Every transaction is framed as `[opcode, address] + payload`. The chip shifts
//! out its two status bytes while the header is clocked in, and the engine keeps
//! the last pair it has seen. No transaction carries more than
//! [`MAX_PAYLOAD`](crate::config::MAX_PAYLOAD) payload bytes. Longer requests are
//! rejected before any byte is sent.
//!
//! # Example
//! ```ignore
//! use s2lp::{Device, ClockFrequency, registers::DeviceInfo};
//!
//! let mut device = Device::new(spi, cs, sdn, delay, ClockFrequency::Mhz50);
//! device.initialize()?;
//!
//! // Read a register
//! let info: DeviceInfo = device.read_register()?;
//!
//! // Write to the FIFO
//! device.write_fifo(&[0x01, 0x02, 0x03])?;
//! ```

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use regiface::{ByteArray, Command, NoParameters, ReadableRegister, WritableRegister};

use crate::commands::Status;
use crate::config::{ClockFrequency, MAX_PAYLOAD, RESET_DELAY_MS};
use crate::frame::{Frame, Opcode};
use crate::registers::{DeviceInfo, XoRcoConfig0, FIFO_ADDRESS};
use crate::Error;

/// Main device interface for the S2-LP radio.
///
/// This struct owns the SPI bus, the chip select (CS) and shutdown (SDN) lines and
/// a delay provider. Chip select is driven by the device itself, so the bus must
/// not be shared with other devices without an external arbiter.
/// It supports both synchronous operations through the embedded-hal traits and
/// asynchronous operations through embedded-hal-async.
pub struct Device<SPI, CS, SDN, D> {
    spi: SPI,
    cs: CS,
    sdn: SDN,
    delay: D,
    clock: ClockFrequency,
    status: [u8; 2],
    tx: Frame,
    rx: Frame,
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D> {
    /// Creates a new Device instance.
    ///
    /// No I/O is performed. Call [`initialize`](Device::initialize) to bring
    /// the chip out of shutdown.
    ///
    /// # Arguments
    /// * `spi` - SPI bus, mode 0
    /// * `cs` - Chip select line, active low
    /// * `sdn` - Shutdown line, active high
    /// * `delay` - Millisecond delay provider
    /// * `clock` - Crystal frequency fitted on the board
    pub fn new(spi: SPI, cs: CS, sdn: SDN, delay: D, clock: ClockFrequency) -> Self {
        Self {
            spi,
            cs,
            sdn,
            delay,
            clock,
            status: [0; 2],
            tx: Frame::new(),
            rx: Frame::new(),
        }
    }

    /// Releases the underlying peripherals.
    pub fn release(self) -> (SPI, CS, SDN, D) {
        (self.spi, self.cs, self.sdn, self.delay)
    }

    /// Status decoded from the last transaction. Performs no I/O.
    pub fn status(&self) -> Status {
        Status::from_raw(self.status[0], self.status[1])
    }

    /// Raw status bytes from the last transaction, in MC_STATE0, MC_STATE1 order
    pub fn raw_status(&self) -> [u8; 2] {
        self.status
    }

    /// Crystal frequency
    pub fn clock_frequency(&self) -> ClockFrequency {
        self.clock
    }

    /// Digital clock frequency in Hz
    pub fn digital_clock_frequency(&self) -> u32 {
        self.clock.digital_hz()
    }

    /// Returns true when the digital clock is the crystal divided by two
    pub fn is_digital_clock_divided(&self) -> bool {
        self.clock.is_divided()
    }

    /// Payload of the next write transaction
    pub fn tx_payload_mut(&mut self) -> &mut [u8] {
        self.tx.payload_mut()
    }

    /// Payload received by the last read transaction
    pub fn rx_payload(&self) -> &[u8] {
        self.rx.payload()
    }

    fn capture_status(&mut self) {
        let wire = self.rx.header();
        self.status = [wire[1], wire[0]];
    }

    fn check_length(length: usize) -> Result<(), Error> {
        if length > MAX_PAYLOAD {
            #[cfg(feature = "defmt")]
            defmt::warn!("rejected {=usize} byte transaction", length);
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    CS: OutputPin,
{
    /// Asserts chip select
    pub fn select(&mut self) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: embedded_hal::spi::SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: embedded_hal::delay::DelayNs,
{
    /// Waits for the bus to go idle and deasserts chip select
    pub fn deselect(&mut self) -> Result<(), Error> {
        self.spi.flush().map_err(|_| Error::Bus)?;
        self.cs.set_high().map_err(|_| Error::Pin)
    }

    fn transfer(&mut self, payload_len: usize) -> Result<(), Error> {
        self.spi
            .transfer(self.rx.wire_mut(payload_len), self.tx.wire(payload_len))
            .map_err(|_| Error::Bus)?;
        self.capture_status();
        Ok(())
    }

    /// Sends a write header followed by the first `length` bytes of the TX payload.
    ///
    /// Chip select must be asserted by the caller.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `length` is above 128
    /// * `Error::Bus` - SPI communication failed
    pub fn write(&mut self, address: u8, length: usize) -> Result<(), Error> {
        Self::check_length(length)?;
        self.tx.set_header(Opcode::Write, address);
        self.transfer(length)
    }

    /// Sends a read header and clocks `amount` bytes into the RX payload.
    ///
    /// Chip select must be asserted by the caller.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `amount` is above 128
    /// * `Error::Bus` - SPI communication failed
    pub fn read(&mut self, address: u8, amount: usize) -> Result<(), Error> {
        Self::check_length(amount)?;
        self.tx.set_header(Opcode::Read, address);
        self.transfer(amount)
    }

    /// Sends a command strobe in its own transaction
    pub fn send_command(&mut self, command: u8) -> Result<(), Error> {
        self.tx.set_header(Opcode::Command, command);
        self.select()?;
        let result = self.transfer(0);
        self.deselect()?;
        result
    }

    /// Reads consecutive registers starting at `address` into `values`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - More than 128 registers requested
    /// * `Error::Bus` - SPI communication failed
    pub fn batch_read_registers(&mut self, address: u8, values: &mut [u8]) -> Result<(), Error> {
        Self::check_length(values.len())?;
        self.select()?;
        let result = self.read(address, values.len());
        self.deselect()?;
        result?;

        values.copy_from_slice(&self.rx.payload()[..values.len()]);
        Ok(())
    }

    /// Writes `values` to consecutive registers starting at `address`
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - More than 128 registers given
    /// * `Error::Bus` - SPI communication failed
    pub fn batch_write_registers(&mut self, address: u8, values: &[u8]) -> Result<(), Error> {
        Self::check_length(values.len())?;
        self.tx.payload_mut()[..values.len()].copy_from_slice(values);

        self.select()?;
        let result = self.write(address, values.len());
        self.deselect()?;
        result
    }

    /// Reads a single register
    pub fn read_raw_register(&mut self, address: u8) -> Result<u8, Error> {
        let mut value = [0];
        self.batch_read_registers(address, &mut value)?;
        Ok(value[0])
    }

    /// Writes a single register
    pub fn write_raw_register(&mut self, address: u8, value: u8) -> Result<(), Error> {
        self.batch_write_registers(address, &[value])
    }

    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Deserialization` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        self.batch_read_registers(R::id(), raw_value.as_mut())?;
        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a value to a device register.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing WritableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});
        self.batch_write_registers(R::id(), raw_value.as_ref())
    }

    /// Reads a register, applies `f` and writes the result back
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<(), Error>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8, Error = Infallible>,
        F: FnOnce(R) -> R,
    {
        let value = self.read_register::<R>()?;
        self.write_register(f(value))
    }

    /// Executes a command strobe.
    ///
    /// # Returns
    /// The device status reported while the command was sent
    pub fn execute_command<C>(&mut self, command: C) -> Result<Status, Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        let _ = command.invoking_parameters();
        self.send_command(C::id())?;
        Ok(self.status())
    }

    /// Reads `buffer.len()` bytes from the RX FIFO
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - More than 128 bytes requested, nothing is read
    pub fn read_fifo(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.batch_read_registers(FIFO_ADDRESS, buffer)
    }

    /// Writes `data` to the TX FIFO
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - More than 128 bytes given, nothing is written
    pub fn write_fifo(&mut self, data: &[u8]) -> Result<(), Error> {
        self.batch_write_registers(FIFO_ADDRESS, data)
    }

    /// Reads the status from the MC_STATE registers
    pub fn read_status(&mut self) -> Result<Status, Error> {
        self.read_register::<Status>()
    }

    /// Part number from DEVICE_INFO1
    pub fn part_number(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<DeviceInfo>()?.part_number)
    }

    /// Silicon version from DEVICE_INFO0
    pub fn version_number(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<DeviceInfo>()?.version)
    }

    /// Enables or disables the reference clock divider
    pub fn set_ref_div_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<XoRcoConfig0, _>(|conf| XoRcoConfig0 {
            ref_div: enabled,
            ..conf
        })
    }

    /// Returns true when the reference clock divider is enabled
    pub fn is_ref_div_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<XoRcoConfig0>()?.ref_div)
    }

    /// Resets the chip by toggling the shutdown line
    pub fn reset(&mut self) -> Result<(), Error> {
        self.shutdown()?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.sdn.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Puts the chip in shutdown. All configuration is lost.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.sdn.set_high().map_err(|_| Error::Pin)
    }

    /// Releases the shutdown line and waits for the chip to reach READY
    pub fn wakeup(&mut self) -> Result<(), Error> {
        self.sdn.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Blocks for `ms` milliseconds using the device's delay provider
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Resets the chip and configures the reference divider for the crystal
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.reset()?;
        self.set_ref_div_enabled(self.clock.is_divided())?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "S2-LP initialized, clock {}, ref div {}",
            self.clock,
            self.clock.is_divided()
        );

        Ok(())
    }
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: embedded_hal_async::spi::SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: embedded_hal_async::delay::DelayNs,
{
    /// Asynchronously waits for the bus to go idle and deasserts chip select.
    ///
    /// This is the async version of [`deselect`](Device::deselect).
    pub async fn deselect_async(&mut self) -> Result<(), Error> {
        self.spi.flush().await.map_err(|_| Error::Bus)?;
        self.cs.set_high().map_err(|_| Error::Pin)
    }

    async fn transfer_async(&mut self, payload_len: usize) -> Result<(), Error> {
        self.spi
            .transfer(self.rx.wire_mut(payload_len), self.tx.wire(payload_len))
            .await
            .map_err(|_| Error::Bus)?;
        self.capture_status();
        Ok(())
    }

    /// This is the async version of [`write`](Device::write).
    pub async fn write_async(&mut self, address: u8, length: usize) -> Result<(), Error> {
        Self::check_length(length)?;
        self.tx.set_header(Opcode::Write, address);
        self.transfer_async(length).await
    }

    /// This is the async version of [`read`](Device::read).
    pub async fn read_async(&mut self, address: u8, amount: usize) -> Result<(), Error> {
        Self::check_length(amount)?;
        self.tx.set_header(Opcode::Read, address);
        self.transfer_async(amount).await
    }

    /// This is the async version of [`send_command`](Device::send_command).
    pub async fn send_command_async(&mut self, command: u8) -> Result<(), Error> {
        self.tx.set_header(Opcode::Command, command);
        self.select()?;
        let result = self.transfer_async(0).await;
        self.deselect_async().await?;
        result
    }

    /// This is the async version of [`batch_read_registers`](Device::batch_read_registers).
    pub async fn batch_read_registers_async(
        &mut self,
        address: u8,
        values: &mut [u8],
    ) -> Result<(), Error> {
        Self::check_length(values.len())?;
        self.select()?;
        let result = self.read_async(address, values.len()).await;
        self.deselect_async().await?;
        result?;

        values.copy_from_slice(&self.rx.payload()[..values.len()]);
        Ok(())
    }

    /// This is the async version of [`batch_write_registers`](Device::batch_write_registers).
    pub async fn batch_write_registers_async(
        &mut self,
        address: u8,
        values: &[u8],
    ) -> Result<(), Error> {
        Self::check_length(values.len())?;
        self.tx.payload_mut()[..values.len()].copy_from_slice(values);

        self.select()?;
        let result = self.write_async(address, values.len()).await;
        self.deselect_async().await?;
        result
    }

    /// This is the async version of [`read_raw_register`](Device::read_raw_register).
    pub async fn read_raw_register_async(&mut self, address: u8) -> Result<u8, Error> {
        let mut value = [0];
        self.batch_read_registers_async(address, &mut value).await?;
        Ok(value[0])
    }

    /// This is the async version of [`write_raw_register`](Device::write_raw_register).
    pub async fn write_raw_register_async(&mut self, address: u8, value: u8) -> Result<(), Error> {
        self.batch_write_registers_async(address, &[value]).await
    }

    /// Asynchronously reads a register value from the device.
    ///
    /// This is the async version of [`read_register`](Device::read_register).
    pub async fn read_register_async<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        self.batch_read_registers_async(R::id(), raw_value.as_mut())
            .await?;
        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Asynchronously writes a value to a device register.
    ///
    /// This is the async version of [`write_register`](Device::write_register).
    pub async fn write_register_async<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});
        self.batch_write_registers_async(R::id(), raw_value.as_ref())
            .await
    }

    /// This is the async version of [`modify_register`](Device::modify_register).
    pub async fn modify_register_async<R, F>(&mut self, f: F) -> Result<(), Error>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8, Error = Infallible>,
        F: FnOnce(R) -> R,
    {
        let value = self.read_register_async::<R>().await?;
        self.write_register_async(f(value)).await
    }

    /// Asynchronously executes a command strobe.
    ///
    /// This is the async version of [`execute_command`](Device::execute_command).
    pub async fn execute_command_async<C>(&mut self, command: C) -> Result<Status, Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        let _ = command.invoking_parameters();
        self.send_command_async(C::id()).await?;
        Ok(self.status())
    }

    /// This is the async version of [`read_fifo`](Device::read_fifo).
    pub async fn read_fifo_async(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.batch_read_registers_async(FIFO_ADDRESS, buffer).await
    }

    /// This is the async version of [`write_fifo`](Device::write_fifo).
    pub async fn write_fifo_async(&mut self, data: &[u8]) -> Result<(), Error> {
        self.batch_write_registers_async(FIFO_ADDRESS, data).await
    }

    /// This is the async version of [`read_status`](Device::read_status).
    pub async fn read_status_async(&mut self) -> Result<Status, Error> {
        self.read_register_async::<Status>().await
    }

    /// Asynchronously blocks for `ms` milliseconds.
    pub async fn delay_ms_async(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    /// This is the async version of [`reset`](Device::reset).
    pub async fn reset_async(&mut self) -> Result<(), Error> {
        self.sdn.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_DELAY_MS).await;
        self.sdn.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_DELAY_MS).await;
        Ok(())
    }

    /// This is the async version of [`initialize`](Device::initialize).
    pub async fn initialize_async(&mut self) -> Result<(), Error> {
        self.reset_async().await?;
        let divided = self.clock.is_divided();
        self.modify_register_async::<XoRcoConfig0, _>(|conf| XoRcoConfig0 {
            ref_div: divided,
            ..conf
        })
        .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("S2-LP initialized, clock {}, ref div {}", self.clock, divided);

        Ok(())
    }
}
