//! Simulated S2-LP for integration tests
//!
//! The chip is a 256 byte register file behind the embedded-hal SPI traits.
//! Every transaction answers MC_STATE1 and MC_STATE0 while the header is
//! clocked in, reads and writes at 0xFF go to the FIFOs and command strobes
//! are recorded. Pins and delays share the same event log so tests can check
//! the ordering of a sequence.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use s2lp::{ClockFrequency, Device};

pub const MC_STATE1: u8 = 0x8D;
pub const MC_STATE0: u8 = 0x8E;
pub const FIFO: u8 = 0xFF;

pub type TestDevice = Device<Spi, Pin, Pin, Delay>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Cs(bool),
    Sdn(bool),
    Delay(u32),
    Transfer(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct Chip {
    pub regs: Vec<u8>,
    pub tx_fifo: Vec<u8>,
    pub rx_fifo: VecDeque<u8>,
    pub commands: Vec<u8>,
    pub events: Vec<Event>,
    pub status_reads: usize,
    /// Sets RCO_CAL_OK once MC_STATE1 has been read this many times
    pub cal_ok_after: Option<usize>,
}

impl Chip {
    fn new() -> Self {
        Self {
            regs: vec![0; 256],
            ..Default::default()
        }
    }

    fn exchange(&mut self, read: &mut [u8], write: &[u8]) {
        self.events.push(Event::Transfer(write.to_vec()));
        read.fill(0);
        if write.len() < 2 {
            return;
        }

        let (opcode, address) = (write[0], write[1]);
        if opcode == 0x01 && address == MC_STATE1 {
            self.status_reads += 1;
            if self.cal_ok_after.is_some_and(|n| self.status_reads >= n) {
                self.regs[MC_STATE1 as usize] |= 0x10;
            }
        }

        if read.len() >= 2 {
            read[0] = self.regs[MC_STATE1 as usize];
            read[1] = self.regs[MC_STATE0 as usize];
        }

        let payload = &write[2..];
        match opcode {
            0x00 if address == FIFO => self.tx_fifo.extend_from_slice(payload),
            0x00 => {
                for (i, value) in payload.iter().enumerate() {
                    self.regs[address.wrapping_add(i as u8) as usize] = *value;
                }
            }
            0x01 if address == FIFO => {
                for slot in read.iter_mut().skip(2) {
                    *slot = self.rx_fifo.pop_front().unwrap_or(0);
                }
            }
            0x01 => {
                for (i, slot) in read.iter_mut().skip(2).enumerate() {
                    *slot = self.regs[address.wrapping_add(i as u8) as usize];
                }
            }
            0x80 => self.commands.push(address),
            _ => {}
        }
    }

    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Transfer(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Handle(Rc<RefCell<Chip>>);

impl Handle {
    pub fn reg(&self, address: u8) -> u8 {
        self.0.borrow().regs[address as usize]
    }

    pub fn set_reg(&self, address: u8, value: u8) {
        self.0.borrow_mut().regs[address as usize] = value;
    }

    pub fn chip(&self) -> std::cell::Ref<'_, Chip> {
        self.0.borrow()
    }

    pub fn chip_mut(&self) -> std::cell::RefMut<'_, Chip> {
        self.0.borrow_mut()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }
}

pub struct Spi(Handle);

pub struct Pin {
    handle: Handle,
    chip_select: bool,
}

pub struct Delay(Handle);

/// Builds a device wired to a fresh simulated chip
pub fn device(clock: ClockFrequency) -> (TestDevice, Handle) {
    let handle = Handle(Rc::new(RefCell::new(Chip::new())));
    let device = Device::new(
        Spi(handle.clone()),
        Pin {
            handle: handle.clone(),
            chip_select: true,
        },
        Pin {
            handle: handle.clone(),
            chip_select: false,
        },
        Delay(handle.clone()),
        clock,
    );
    (device, handle)
}

impl embedded_hal::spi::ErrorType for Spi {
    type Error = Infallible;
}

impl embedded_hal::spi::SpiBus for Spi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let write = vec![0; words.len()];
        self.0.chip_mut().exchange(words, &write);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut read = vec![0; words.len()];
        self.0.chip_mut().exchange(&mut read, words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.0.chip_mut().exchange(read, write);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let write = words.to_vec();
        self.0.chip_mut().exchange(words, &write);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal_async::spi::SpiBus for Spi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::read(self, words)
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::write(self, words)
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::transfer(self, read, write)
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::transfer_in_place(self, words)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for Pin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

impl Pin {
    fn record(&self, high: bool) {
        let event = if self.chip_select {
            Event::Cs(high)
        } else {
            Event::Sdn(high)
        };
        self.handle.chip_mut().events.push(event);
    }
}

impl embedded_hal::delay::DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.chip_mut().events.push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.chip_mut().events.push(Event::Delay(ms));
    }
}

impl embedded_hal_async::delay::DelayNs for Delay {
    async fn delay_ns(&mut self, ns: u32) {
        embedded_hal::delay::DelayNs::delay_ns(self, ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        embedded_hal::delay::DelayNs::delay_ms(self, ms);
    }
}

/// Polls a future to completion. The simulated peripherals never pend.
pub fn block_on<F: Future>(future: F) -> F::Output {
    fn clone(_: *const ()) -> RawWaker {
        RawWaker::new(std::ptr::null(), &VTABLE)
    }
    fn noop(_: *const ()) {}
    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

    let waker = unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) };
    let mut context = Context::from_waker(&waker);
    let mut future = pin!(future);
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut context) {
            return output;
        }
    }
}
