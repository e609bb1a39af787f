//! Radio command implementations
//!
//! This module contains the command strobes of the S2-LP and the decoding of
//! the status the chip returns with every transaction:
//!
//! # Command Categories
//! - [`operational`]: State machine control
//!   - Enter TX, RX, READY, STANDBY and SLEEP
//!   - Lock the synthesizer
//!   - Abort, soft reset, flush the FIFOs
//!
//! - [`status`]: Status decoding
//!   - Main state machine state
//!   - Crystal, FIFO and RCO calibration flags
//!
//! # Command Execution
//! Commands are executed through [`Device::execute_command`](crate::Device::execute_command),
//! which returns the status reported by the chip while the command byte was
//! clocked in. That status reflects the state before the command took effect.
//!
//! # Important Notes
//! - A command sent from a state that does not accept it is ignored
//! - Read the status again to confirm a state transition

pub mod operational;
pub mod status;

pub use operational::*;
pub use status::*;
