//! Command strobes
//!
//! This module contains the commands accepted by the S2-LP main state machine:
//! - Entering TX, RX and the low power states
//! - Locking the synthesizer on the TX or RX frequency
//! - Aborting an ongoing operation
//! - Flushing the FIFOs
//! - Soft reset
//!
//! None of the strobes carry parameters. Each one is a single byte sent with
//! the command opcode, and the chip replies with its status like in any other
//! transaction. Most commands are only accepted from specific states, see the
//! notes on each command.

use crate::{Command, NoParameters};

/// TX command (0x60)
///
/// Starts a transmission.
///
/// # Important Notes
/// - Accepted from READY and LOCKTX
/// - The TX FIFO must be filled before the command in packet mode
#[derive(Debug, Clone, Copy, Default)]
pub struct StartTx;

impl Command for StartTx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x60
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// RX command (0x61)
///
/// Starts a reception. Accepted from READY and LOCKRX.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartRx;

impl Command for StartRx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x61
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// READY command (0x62)
///
/// Moves the device to READY from STANDBY, SLEEP or LOCK.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoReady;

impl Command for GoReady {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x62
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// STANDBY command (0x63)
///
/// Only accepted from READY.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoStandby;

impl Command for GoStandby {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x63
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SLEEP command (0x64)
///
/// Enters SLEEP A or SLEEP B, depending on the configured sleep mode.
///
/// # Important Notes
/// - Only accepted from READY
/// - FIFO contents are lost in SLEEP A
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSleep;

impl Command for GoSleep {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x64
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// LOCKRX command (0x65)
///
/// Locks the synthesizer on the RX frequency and stays in LOCK.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockRx;

impl Command for LockRx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x65
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// LOCKTX command (0x66)
///
/// Locks the synthesizer on the TX frequency and stays in LOCK.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockTx;

impl Command for LockTx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x66
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SABORT command (0x67)
///
/// Aborts an ongoing TX or RX and returns to READY.
#[derive(Debug, Clone, Copy, Default)]
pub struct Abort;

impl Command for Abort {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x67
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// LDC_RELOAD command (0x68)
///
/// Reloads the low duty cycle timer with the programmed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LdcReload;

impl Command for LdcReload {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x68
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SRES command (0x70)
///
/// Soft reset. All registers return to their reset values and the device
/// restarts from READY.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftReset;

impl Command for SoftReset {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x70
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// FLUSHRXFIFO command (0x71)
#[derive(Debug, Clone, Copy, Default)]
pub struct FlushRxFifo;

impl Command for FlushRxFifo {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x71
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// FLUSHTXFIFO command (0x72)
#[derive(Debug, Clone, Copy, Default)]
pub struct FlushTxFifo;

impl Command for FlushTxFifo {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x72
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SEQUENCE_UPDATE command (0x73)
///
/// Reloads the packet sequence counter with the value in the protocol
/// registers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceUpdate;

impl Command for SequenceUpdate {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x73
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
