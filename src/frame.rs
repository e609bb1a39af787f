//! SPI transaction frames
//!
//! Every transaction with the S2-LP starts with a two byte header: an opcode
//! followed by a register address or command code. While the header is
//! clocked out the chip answers with its two status bytes, so the response
//! frame has the same layout as the request frame.
//!
//! A [`Frame`] owns the bytes of one direction of a transaction. The payload
//! is only reachable through a view that starts after the header and is never
//! longer than [`MAX_PAYLOAD`] bytes.

use crate::config::MAX_PAYLOAD;

/// Length of the header preceding the payload of every frame
pub const HEADER_LEN: usize = 2;

/// Total length of a frame buffer
pub const FRAME_LEN: usize = HEADER_LEN + MAX_PAYLOAD;

/// Header opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Register or FIFO write
    Write = 0x00,
    /// Register or FIFO read
    Read = 0x01,
    /// Command strobe
    Command = 0x80,
}

/// Fixed size transaction buffer with a bounded payload view
#[derive(Debug, Clone)]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Creates a zeroed frame
    pub const fn new() -> Self {
        Self {
            bytes: [0; FRAME_LEN],
        }
    }

    /// Stages the header of the next transaction
    pub fn set_header(&mut self, opcode: Opcode, address: u8) {
        self.bytes[0] = opcode as u8;
        self.bytes[1] = address;
    }

    /// The two header bytes as they sit on the wire
    pub fn header(&self) -> [u8; HEADER_LEN] {
        [self.bytes[0], self.bytes[1]]
    }

    /// Payload view
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Mutable payload view
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_LEN..]
    }

    /// Header plus the first `payload_len` payload bytes.
    ///
    /// `payload_len` must already be checked against [`MAX_PAYLOAD`].
    pub(crate) fn wire(&self, payload_len: usize) -> &[u8] {
        &self.bytes[..HEADER_LEN + payload_len]
    }

    pub(crate) fn wire_mut(&mut self, payload_len: usize) -> &mut [u8] {
        &mut self.bytes[..HEADER_LEN + payload_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_view_excludes_header() {
        let mut frame = Frame::new();
        frame.set_header(Opcode::Read, 0xF0);
        frame.payload_mut()[0] = 0xAA;

        assert_eq!(frame.payload().len(), MAX_PAYLOAD);
        assert_eq!(frame.header(), [0x01, 0xF0]);
        assert_eq!(frame.wire(1), &[0x01, 0xF0, 0xAA]);
    }

    #[test]
    fn command_header_uses_command_opcode() {
        let mut frame = Frame::new();
        frame.set_header(Opcode::Command, 0x62);
        assert_eq!(frame.wire(0), &[0x80, 0x62]);
    }
}
