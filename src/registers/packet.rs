//! Packet handling registers
//!
//! This module contains registers used to configure the packet handler:
//! - Packet format and data sources
//! - Preamble, sync word and postamble lengths
//! - Packet length and length field
//! - CRC, whitening and data coding
//! - Address fields and packet filtering
//! - Automatic retransmission and protocol timers

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::InvalidValue;

/// Packet format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketFormat {
    /// Basic packet
    Basic,
    /// IEEE 802.15.4g
    Ieee802154g,
    /// UART over the air
    Uart,
    /// STack packet
    Stack,
}

/// Source of the data delivered by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxSource {
    /// Packet handler, data in the RX FIFO
    Normal,
    /// Raw data through the RX FIFO
    DirectFifo,
    /// Raw data on a GPIO
    DirectGpio,
}

impl TryFrom<u8> for RxSource {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::DirectFifo),
            2 => Ok(Self::DirectGpio),
            invalid => Err(InvalidValue(invalid)),
        }
    }
}

/// Source of the data sent by the transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxSource {
    /// Packet handler, data from the TX FIFO
    Normal,
    /// Raw data from the TX FIFO
    DirectFifo,
    /// Raw data from a GPIO
    DirectGpio,
    /// PN9 pseudo random sequence
    Pn9,
}

/// Size of the length field in variable length packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LengthFieldSize {
    OneByte,
    TwoBytes,
}

/// CRC mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcMode {
    /// No CRC
    None = 0,
    /// 8 bit, polynomial 0x07
    Poly07 = 1,
    /// 16 bit, polynomial 0x8005
    Poly8005 = 2,
    /// 16 bit, polynomial 0x1021
    Poly1021 = 3,
    /// 24 bit, polynomial 0x864CFB
    Poly864Cfb = 4,
    /// 32 bit, polynomial 0x04C11DB7
    Poly04C11Db7 = 5,
}

impl CrcMode {
    /// CRC polynomial, or zero when no CRC is used
    pub const fn polynomial(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Poly07 => 0x07,
            Self::Poly8005 => 0x8005,
            Self::Poly1021 => 0x1021,
            Self::Poly864Cfb => 0x86_4CFB,
            Self::Poly04C11Db7 => 0x04C1_1DB7,
        }
    }
}

impl TryFrom<u8> for CrcMode {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Poly07),
            2 => Ok(Self::Poly8005),
            3 => Ok(Self::Poly1021),
            4 => Ok(Self::Poly864Cfb),
            5 => Ok(Self::Poly04C11Db7),
            invalid => Err(InvalidValue(invalid)),
        }
    }
}

/// FIFO monitored by the almost full/empty interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoSelect {
    Rx,
    Tx,
}

/// Preamble and sync length register group (address: 0x2B)
///
/// Covers PCKTCTRL6 and PCKTCTRL5.
///
/// # Register Layout
/// - PCKTCTRL6 bits 7:2: Sync word length in bits
/// - PCKTCTRL6 bits 1:0 and PCKTCTRL5: Preamble length in bit pairs
#[register(0x2Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PreambleSync {
    /// Sync word length in bits (0-32)
    pub sync_length: u8,
    /// Preamble length in bit pairs (0-1023)
    pub preamble_length: u16,
}

/// Packet control 4 register (address: 0x2D)
#[register(0x2Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl4 {
    /// Bit 7
    pub length_field: LengthFieldSize,
    /// Bit 3: include the destination address field
    pub destination_address: bool,
    pub reserved: u8,
}

/// Packet control 3 register (address: 0x2E)
///
/// # Register Layout
/// - Bits 7:6: Packet format
/// - Bits 5:4: RX data source
/// - Bits 3:2: Byte swap and FSK symbol swap
/// - Bits 1:0: Preamble pattern
#[register(0x2Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl3 {
    pub format: PacketFormat,
    /// RX source code, decoded by [`RxSource::try_from`]
    pub rx_source: u8,
    pub reserved: u8,
    pub preamble_pattern: u8,
}

/// Packet control 2 register (address: 0x2F)
#[register(0x2Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl2 {
    /// Bit 2: 3-out-of-6 encoding
    pub three_of_six: bool,
    /// Bit 1: Manchester encoding
    pub manchester: bool,
    /// Bit 0: variable packet length
    pub variable_length: bool,
    /// Bits 7:3
    pub reserved: u8,
}

/// Packet control 1 register (address: 0x30)
///
/// # Register Layout
/// - Bits 7:5: CRC mode
/// - Bit 4: Whitening
/// - Bits 3:2: TX data source
/// - Bit 1: Second sync word select
/// - Bit 0: FEC (convolutional coding)
#[register(0x30u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl1 {
    /// CRC mode code, decoded by [`CrcMode::try_from`]
    pub crc_mode: u8,
    pub whitening: bool,
    pub tx_source: TxSource,
    pub second_sync: bool,
    pub fec: bool,
}

/// Packet length register group (address: 0x31)
///
/// Covers PCKTLEN1 and PCKTLEN0. Length of the payload in fixed length mode,
/// or the maximum payload length in variable length mode.
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketLength {
    pub length: u16,
}

/// Postamble register (address: 0x38)
///
/// Postamble length in bit pairs.
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Postamble {
    pub length: u8,
}

/// Protocol 2 register (address: 0x39)
///
/// # Register Layout
/// - Bit 7: Carrier sense timeout mask
/// - Bit 6: SQI timeout mask
/// - Bit 5: PQI timeout mask
/// - Bit 2: FIFO for the almost full/empty interrupts (1 = TX)
#[register(0x39u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Protocol2 {
    pub cs_timeout_mask: bool,
    pub sqi_timeout_mask: bool,
    pub pqi_timeout_mask: bool,
    pub fifo_select: FifoSelect,
    pub reserved: u8,
}

/// Protocol 1 register (address: 0x3A)
#[register(0x3Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Protocol1 {
    /// Bit 0: discard packets that fail the filtering
    pub auto_packet_filter: bool,
    pub reserved: u8,
}

/// Protocol 0 register (address: 0x3B)
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Protocol0 {
    /// Bits 7:4: maximum number of retransmissions
    pub max_retransmissions: u8,
    /// Bits 3:0
    pub reserved: u8,
}

/// Packet filter options register (address: 0x40)
#[register(0x40u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketFilterOptions {
    /// Bit 6: RX timeout stop condition (0 = OR, 1 = AND)
    pub rx_timeout_and: bool,
    /// Bit 1: discard packets with a different destination address
    pub destination_filter: bool,
    /// Bit 0: discard packets with a wrong CRC
    pub crc_filter: bool,
    pub reserved: u8,
}

/// Destination address register (address: 0x42)
///
/// PCKT_FLT_GOALS3.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct DestinationAddress {
    pub address: u8,
}

/// Source address register (address: 0x45)
///
/// PCKT_FLT_GOALS0.
#[register(0x45u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SourceAddress {
    pub address: u8,
}

/// Received packet length register group (address: 0xA4)
///
/// Covers RX_PCKT_LEN1 and RX_PCKT_LEN0.
#[register(0xA4u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxPacketLength {
    pub length: u16,
}

impl FromByteArray for PreambleSync {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sync_length: bytes[0] >> 2,
            preamble_length: u16::from_be_bytes([bytes[0] & 0x03, bytes[1]]),
        })
    }
}

impl ToByteArray for PreambleSync {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [msb, lsb] = (self.preamble_length & 0x03FF).to_be_bytes();
        Ok([(self.sync_length << 2) | msb, lsb])
    }
}

impl FromByteArray for PacketControl4 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length_field: if bytes[0] & 0x80 != 0 {
                LengthFieldSize::TwoBytes
            } else {
                LengthFieldSize::OneByte
            },
            destination_address: bytes[0] & 0x08 != 0,
            reserved: bytes[0] & 0x77,
        })
    }
}

impl ToByteArray for PacketControl4 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut value = self.reserved & 0x77;
        if self.length_field == LengthFieldSize::TwoBytes {
            value |= 0x80;
        }
        if self.destination_address {
            value |= 0x08;
        }
        Ok([value])
    }
}

impl FromByteArray for PacketControl3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let format = match bytes[0] >> 6 {
            0 => PacketFormat::Basic,
            1 => PacketFormat::Ieee802154g,
            2 => PacketFormat::Uart,
            _ => PacketFormat::Stack,
        };
        Ok(Self {
            format,
            rx_source: (bytes[0] >> 4) & 0x03,
            reserved: bytes[0] & 0x0C,
            preamble_pattern: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for PacketControl3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.format as u8) << 6)
            | ((self.rx_source & 0x03) << 4)
            | (self.reserved & 0x0C)
            | (self.preamble_pattern & 0x03)])
    }
}

impl FromByteArray for PacketControl2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            three_of_six: bytes[0] & 0x04 != 0,
            manchester: bytes[0] & 0x02 != 0,
            variable_length: bytes[0] & 0x01 != 0,
            reserved: bytes[0] & 0xF8,
        })
    }
}

impl ToByteArray for PacketControl2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0xF8)
            | (self.three_of_six as u8) << 2
            | (self.manchester as u8) << 1
            | self.variable_length as u8])
    }
}

impl FromByteArray for PacketControl1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let tx_source = match (bytes[0] >> 2) & 0x03 {
            0 => TxSource::Normal,
            1 => TxSource::DirectFifo,
            2 => TxSource::DirectGpio,
            _ => TxSource::Pn9,
        };
        Ok(Self {
            crc_mode: bytes[0] >> 5,
            whitening: bytes[0] & 0x10 != 0,
            tx_source,
            second_sync: bytes[0] & 0x02 != 0,
            fec: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for PacketControl1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.crc_mode & 0x07) << 5)
            | (self.whitening as u8) << 4
            | ((self.tx_source as u8) << 2)
            | (self.second_sync as u8) << 1
            | self.fec as u8])
    }
}

impl FromByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.length.to_be_bytes())
    }
}

impl FromByteArray for Postamble {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for Postamble {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}

impl FromByteArray for Protocol2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            cs_timeout_mask: bytes[0] & 0x80 != 0,
            sqi_timeout_mask: bytes[0] & 0x40 != 0,
            pqi_timeout_mask: bytes[0] & 0x20 != 0,
            fifo_select: if bytes[0] & 0x04 != 0 {
                FifoSelect::Tx
            } else {
                FifoSelect::Rx
            },
            reserved: bytes[0] & 0x1B,
        })
    }
}

impl ToByteArray for Protocol2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.cs_timeout_mask as u8) << 7
            | (self.sqi_timeout_mask as u8) << 6
            | (self.pqi_timeout_mask as u8) << 5
            | ((self.fifo_select == FifoSelect::Tx) as u8) << 2
            | (self.reserved & 0x1B)])
    }
}

impl FromByteArray for Protocol1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            auto_packet_filter: bytes[0] & 0x01 != 0,
            reserved: bytes[0] & 0xFE,
        })
    }
}

impl ToByteArray for Protocol1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0xFE) | self.auto_packet_filter as u8])
    }
}

impl FromByteArray for Protocol0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            max_retransmissions: bytes[0] >> 4,
            reserved: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for Protocol0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.max_retransmissions << 4) | (self.reserved & 0x0F)])
    }
}

impl FromByteArray for PacketFilterOptions {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            rx_timeout_and: bytes[0] & 0x40 != 0,
            destination_filter: bytes[0] & 0x02 != 0,
            crc_filter: bytes[0] & 0x01 != 0,
            reserved: bytes[0] & 0xBC,
        })
    }
}

impl ToByteArray for PacketFilterOptions {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.reserved & 0xBC)
            | (self.rx_timeout_and as u8) << 6
            | (self.destination_filter as u8) << 1
            | self.crc_filter as u8])
    }
}

impl FromByteArray for DestinationAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for DestinationAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for SourceAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for SourceAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for RxPacketLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes),
        })
    }
}
