//! Packet handler settings

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::Device;
use crate::registers::{
    CrcMode, DestinationAddress, LengthFieldSize, PacketControl1, PacketControl2, PacketControl3,
    PacketControl4, PacketFilterOptions, PacketFormat, PacketLength, Postamble, PreambleSync,
    Protocol1, RxPacketLength, SourceAddress,
};
use crate::Error;

const PREAMBLE_LENGTH_MAX: u16 = 0x3FF;
const SYNC_LENGTH_MAX: u8 = 32;
const PREAMBLE_PATTERN_MAX: u8 = 0b11;

/// Line coding applied to the payload
///
/// The codings are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataCoding {
    None,
    /// Convolutional coding with interleaving
    Fec,
    Manchester,
    ThreeOfSix,
}

impl<SPI, CS, SDN, D> Device<SPI, CS, SDN, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Selects the packet format, keeping the other PCKTCTRL3 fields
    pub fn set_packet_format(&mut self, format: PacketFormat) -> Result<(), Error> {
        self.modify_register::<PacketControl3, _>(|ctrl| PacketControl3 { format, ..ctrl })
    }

    /// Reads the packet format
    pub fn packet_format(&mut self) -> Result<PacketFormat, Error> {
        Ok(self.read_register::<PacketControl3>()?.format)
    }

    /// Selects one of the four preamble bit patterns (0-3)
    pub fn set_preamble_pattern(&mut self, pattern: u8) -> Result<(), Error> {
        if pattern > PREAMBLE_PATTERN_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<PacketControl3, _>(|ctrl| PacketControl3 {
            preamble_pattern: pattern,
            ..ctrl
        })
    }

    /// Reads the preamble pattern (0-3)
    pub fn preamble_pattern(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<PacketControl3>()?.preamble_pattern)
    }

    /// Sets the preamble length in bit pairs
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Length above 1023
    pub fn set_preamble_length(&mut self, length: u16) -> Result<(), Error> {
        if length > PREAMBLE_LENGTH_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<PreambleSync, _>(|ps| PreambleSync {
            preamble_length: length,
            ..ps
        })
    }

    /// Reads the preamble length in bit pairs
    pub fn preamble_length(&mut self) -> Result<u16, Error> {
        Ok(self.read_register::<PreambleSync>()?.preamble_length)
    }

    /// Sets the sync word length in bits
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - Length above 32
    pub fn set_sync_length(&mut self, length: u8) -> Result<(), Error> {
        if length > SYNC_LENGTH_MAX {
            return Err(Error::InvalidArgument);
        }
        self.modify_register::<PreambleSync, _>(|ps| PreambleSync {
            sync_length: length,
            ..ps
        })
    }

    /// Reads the sync word length in bits
    pub fn sync_length(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<PreambleSync>()?.sync_length)
    }

    /// Sets the payload length for fixed length packets, or the maximum
    /// length for variable length packets
    pub fn set_packet_length(&mut self, length: u16) -> Result<(), Error> {
        self.write_register(PacketLength { length })
    }

    /// Reads the packet length field
    pub fn packet_length(&mut self) -> Result<u16, Error> {
        Ok(self.read_register::<PacketLength>()?.length)
    }

    /// Length of the last received packet
    pub fn rx_packet_length(&mut self) -> Result<u16, Error> {
        Ok(self.read_register::<RxPacketLength>()?.length)
    }

    /// Switches between variable and fixed length packets
    pub fn set_variable_length(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PacketControl2, _>(|ctrl| PacketControl2 {
            variable_length: enabled,
            ..ctrl
        })
    }

    /// Checks whether variable length packets are enabled
    pub fn is_variable_length(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketControl2>()?.variable_length)
    }

    /// Sets the size of the length field in variable length packets
    pub fn set_length_field_size(&mut self, size: LengthFieldSize) -> Result<(), Error> {
        self.modify_register::<PacketControl4, _>(|ctrl| PacketControl4 {
            length_field: size,
            ..ctrl
        })
    }

    /// Reads the size of the length field
    pub fn length_field_size(&mut self) -> Result<LengthFieldSize, Error> {
        Ok(self.read_register::<PacketControl4>()?.length_field)
    }

    /// Includes the destination address field in transmitted packets
    pub fn set_destination_address_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PacketControl4, _>(|ctrl| PacketControl4 {
            destination_address: enabled,
            ..ctrl
        })
    }

    /// Checks whether the destination address field is sent
    pub fn is_destination_address_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketControl4>()?.destination_address)
    }

    /// Sets the destination address written into sent packets
    pub fn set_destination_address(&mut self, address: u8) -> Result<(), Error> {
        self.write_register(DestinationAddress { address })
    }

    /// Reads the destination address
    pub fn destination_address(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<DestinationAddress>()?.address)
    }

    /// Sets the address this node filters received packets on
    pub fn set_source_address(&mut self, address: u8) -> Result<(), Error> {
        self.write_register(SourceAddress { address })
    }

    /// Reads the source address
    pub fn source_address(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<SourceAddress>()?.address)
    }

    /// Sets the postamble length in bit pairs
    pub fn set_postamble_length(&mut self, length: u8) -> Result<(), Error> {
        self.write_register(Postamble { length })
    }

    /// Reads the postamble length in bit pairs
    pub fn postamble_length(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Postamble>()?.length)
    }

    /// Selects the CRC polynomial appended to each packet
    pub fn set_crc_mode(&mut self, mode: CrcMode) -> Result<(), Error> {
        self.modify_register::<PacketControl1, _>(|ctrl| PacketControl1 {
            crc_mode: mode as u8,
            ..ctrl
        })
    }

    /// Reads the CRC mode
    ///
    /// # Errors
    /// * `Error::Deserialization` - The CRC field holds code 6 or 7
    pub fn crc_mode(&mut self) -> Result<CrcMode, Error> {
        let code = self.read_register::<PacketControl1>()?.crc_mode;
        CrcMode::try_from(code).map_err(|_| Error::Deserialization)
    }

    /// Selects the payload coding.
    ///
    /// All codings are cleared first, then the requested one is enabled.
    pub fn set_data_coding(&mut self, coding: DataCoding) -> Result<(), Error> {
        self.modify_register::<PacketControl2, _>(|ctrl| PacketControl2 {
            three_of_six: coding == DataCoding::ThreeOfSix,
            manchester: coding == DataCoding::Manchester,
            ..ctrl
        })?;
        self.modify_register::<PacketControl1, _>(|ctrl| PacketControl1 {
            fec: coding == DataCoding::Fec,
            ..ctrl
        })
    }

    /// Reads the payload coding
    ///
    /// If several coding bits are set, 3-out-of-6 wins over Manchester, which
    /// wins over FEC.
    pub fn data_coding(&mut self) -> Result<DataCoding, Error> {
        let ctrl2 = self.read_register::<PacketControl2>()?;
        let ctrl1 = self.read_register::<PacketControl1>()?;

        Ok(if ctrl2.three_of_six {
            DataCoding::ThreeOfSix
        } else if ctrl2.manchester {
            DataCoding::Manchester
        } else if ctrl1.fec {
            DataCoding::Fec
        } else {
            DataCoding::None
        })
    }

    /// Enables data whitening
    pub fn set_whitening(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PacketControl1, _>(|ctrl| PacketControl1 {
            whitening: enabled,
            ..ctrl
        })
    }

    /// Checks whether data whitening is enabled
    pub fn is_whitening_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketControl1>()?.whitening)
    }

    /// Discards received packets with a wrong CRC
    pub fn set_crc_filtering(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PacketFilterOptions, _>(|opts| PacketFilterOptions {
            crc_filter: enabled,
            ..opts
        })
    }

    /// Checks whether packets with a bad CRC are discarded
    pub fn is_crc_filtering_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketFilterOptions>()?.crc_filter)
    }

    /// Discards received packets addressed to another node
    pub fn set_destination_address_filtering(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<PacketFilterOptions, _>(|opts| PacketFilterOptions {
            destination_filter: enabled,
            ..opts
        })
    }

    /// Checks whether received packets are filtered on the destination address
    pub fn is_destination_address_filtering_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketFilterOptions>()?.destination_filter)
    }

    /// Enables automatic discarding of filtered packets
    pub fn set_auto_packet_filtering(&mut self, enabled: bool) -> Result<(), Error> {
        self.modify_register::<Protocol1, _>(|proto| Protocol1 {
            auto_packet_filter: enabled,
            ..proto
        })
    }

    /// Checks whether automatic packet filtering is enabled
    pub fn is_auto_packet_filtering_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<Protocol1>()?.auto_packet_filter)
    }
}
