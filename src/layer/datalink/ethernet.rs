use crate::engine::constants::ETHERNET_HEADER_LEN;
use crate::layer::checksum::{be16_at, put_be16};

/// Ethernet II header.
///
///   +-------------------+-------------------+-----------+
///   | Destination (6)   | Source (6)        | Type (2)  |
///   +-------------------+-------------------+-----------+
#[derive(Debug, Clone, Copy)]
pub struct EthernetHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> EthernetHeader<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < ETHERNET_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    pub fn destination(&self) -> [u8; 6] {
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&self.bytes[0..6]);
        mac
    }

    pub fn source(&self) -> [u8; 6] {
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&self.bytes[6..12]);
        mac
    }

    pub fn ethertype(&self) -> u16 {
        be16_at(self.bytes, 12).unwrap_or_default()
    }
}

pub(crate) fn write_ethertype(header: &mut [u8], ethertype: u16) -> Option<()> {
    put_be16(header, 12, ethertype)
}
