use crate::engine::constants::UDP_HEADER_LEN;
use crate::layer::checksum::{be16_at, put_be16};

/// Represents a UDP packet header.
///
/// The UDP header format is defined in RFC 768 and consists of:
///
///   0      7 8     15 16    23 24    31
///  +--------+--------+--------+--------+
///  |     Source      |   Destination   |
///  |      Port       |      Port       |
///  +--------+--------+--------+--------+
///  |                 |                 |
///  |     Length      |    Checksum     |
///  +--------+--------+--------+--------+
///  |                                   |
///  |            Data (variable)        |
///  +-----------------------------------+
///
#[derive(Debug, Clone, Copy)]
pub struct UdpHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> UdpHeader<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < UDP_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    pub fn source_port(&self) -> u16 {
        be16_at(self.bytes, 0).unwrap_or_default()
    }

    pub fn destination_port(&self) -> u16 {
        be16_at(self.bytes, 2).unwrap_or_default()
    }

    /// Length of UDP header and data in bytes
    pub fn length(&self) -> u16 {
        be16_at(self.bytes, 4).unwrap_or_default()
    }

    pub fn checksum(&self) -> u16 {
        be16_at(self.bytes, 6).unwrap_or_default()
    }
}

pub(crate) fn write_length(header: &mut [u8], length: u16) -> Option<()> {
    put_be16(header, 4, length)
}
