//! Interrupt status and masks

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::Device;
use crate::registers::{FifoSelect, InterruptMask, InterruptStatus, Interrupts, Protocol2};
use crate::Error;

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Reads the pending interrupts.
    ///
    /// When `clear` is set the status registers are zeroed after the read.
    pub fn interrupts(&mut self, clear: bool) -> Result<Interrupts, Error> {
        let status = self.read_register::<InterruptStatus>()?;
        if clear {
            self.write_register(InterruptStatus {
                interrupts: Interrupts::empty(),
            })?;
        }
        Ok(status.interrupts)
    }

    /// Selects the interrupt sources routed to the nIRQ output
    pub fn set_interrupt_mask(&mut self, mask: Interrupts) -> Result<(), Error> {
        self.write_register(InterruptMask { interrupts: mask })
    }

    /// Reads the interrupt sources routed to the nIRQ output
    pub fn interrupt_mask(&mut self) -> Result<Interrupts, Error> {
        Ok(self.read_register::<InterruptMask>()?.interrupts)
    }

    /// Selects the FIFO watched by the almost full and almost empty interrupts
    pub fn set_fifo_interrupt_source(&mut self, fifo: FifoSelect) -> Result<(), Error> {
        self.modify_register::<Protocol2, _>(|proto| Protocol2 {
            fifo_select: fifo,
            ..proto
        })
    }

    /// Reads the FIFO watched by the almost full and almost empty interrupts
    pub fn fifo_interrupt_source(&mut self) -> Result<FifoSelect, Error> {
        Ok(self.read_register::<Protocol2>()?.fifo_select)
    }
}
