use std::net::Ipv6Addr;

use crate::engine::constants::IPV6_HEADER_LEN;
use crate::layer::checksum::{be16_at, be32_at, put_be16};

/// IPv6 fixed header (RFC 8200).
///
///   +-------+---------------+---------------------------------------+
///   |Ver (4)| Traffic Class |           Flow Label (20)             |
///   +-------+---------------+-------+---------------+---------------+
///   |      Payload Length (16)      | Next Hdr (8)  | Hop Limit (8) |
///   +-------------------------------+---------------+---------------+
///   |                     Source Address (128)                      |
///   +---------------------------------------------------------------+
///   |                  Destination Address (128)                    |
///   +---------------------------------------------------------------+
///
/// Extension headers are not walked: `next_header` is taken as the upper
/// layer protocol.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Header<'a> {
    bytes: &'a [u8],
}

impl<'a> Ipv6Header<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < IPV6_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    fn first_word(&self) -> u32 {
        be32_at(self.bytes, 0).unwrap_or_default()
    }

    pub fn version(&self) -> u8 {
        ((self.first_word() >> 28) & 0x0f) as u8
    }

    pub fn traffic_class(&self) -> u8 {
        ((self.first_word() >> 20) & 0xff) as u8
    }

    pub fn flow_label(&self) -> u32 {
        self.first_word() & 0x000f_ffff
    }

    /// Bytes following the fixed 40-byte header.
    pub fn payload_length(&self) -> u16 {
        be16_at(self.bytes, 4).unwrap_or_default()
    }

    pub fn next_header(&self) -> u8 {
        self.bytes[6]
    }

    pub fn hop_limit(&self) -> u8 {
        self.bytes[7]
    }

    pub fn source(&self) -> Ipv6Addr {
        address_at(self.bytes, 8)
    }

    pub fn destination(&self) -> Ipv6Addr {
        address_at(self.bytes, 24)
    }
}

fn address_at(bytes: &[u8], offset: usize) -> Ipv6Addr {
    let mut octets = [0u8; 16];
    octets.copy_from_slice(&bytes[offset..offset + 16]);
    Ipv6Addr::from(octets)
}

pub(crate) fn write_payload_length(header: &mut [u8], payload_length: u16) -> Option<()> {
    put_be16(header, 4, payload_length)
}

pub(crate) fn write_next_header(header: &mut [u8], next_header: u8) -> Option<()> {
    *header.get_mut(6)? = next_header;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_ipv6_header() -> Vec<u8> {
        let mut header = vec![
            0x6a, 0xb1, 0x23, 0x45, // version 6, tc 0xab, flow 0x12345
            0x00, 0x08, 17, 64, // payload len 8, next udp, hop limit 64
        ];
        header.extend_from_slice(&Ipv6Addr::LOCALHOST.octets());
        header.extend_from_slice(&Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2).octets());
        header
    }

    #[test]
    fn reads_fixed_fields() {
        let header = create_ipv6_header();
        let ipv6 = Ipv6Header::new(&header).expect("40 bytes is a full header");

        assert_eq!(ipv6.version(), 6);
        assert_eq!(ipv6.traffic_class(), 0xab);
        assert_eq!(ipv6.flow_label(), 0x12345);
        assert_eq!(ipv6.payload_length(), 8);
        assert_eq!(ipv6.next_header(), 17);
        assert_eq!(ipv6.hop_limit(), 64);
        assert_eq!(ipv6.source(), Ipv6Addr::LOCALHOST);
        assert_eq!(ipv6.destination(), Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2));
    }

    #[test]
    fn writers_update_length_and_next_header() {
        let mut header = create_ipv6_header();
        write_payload_length(&mut header, 0x0102).expect("field in range");
        write_next_header(&mut header, 6).expect("field in range");
        let ipv6 = Ipv6Header::new(&header).expect("full header");
        assert_eq!(ipv6.payload_length(), 0x0102);
        assert_eq!(ipv6.next_header(), 6);
    }

    #[test]
    fn short_slice_has_no_view() {
        assert!(Ipv6Header::new(&[0x60; 39]).is_none());
    }
}
