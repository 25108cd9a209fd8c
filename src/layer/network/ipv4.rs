use std::net::Ipv4Addr;

use crate::engine::constants::IPV4_HEADER_LEN;
use crate::layer::checksum::{be16_at, ipv4_checksum, put_be16};

const FLAG_MORE_FRAGMENTS: u16 = 0x2000;
const FLAG_DONT_FRAGMENT: u16 = 0x4000;
const FRAGMENT_OFFSET_MASK: u16 = 0x1fff;

/// IPv4 Header
///
/// The IPv4 header format is defined in RFC 791. A typical header looks like:
///
///   +---------------------------------------------------------------+
///   | Version (4) | IHL (4) | DSCP (6) | ECN (2)                    |
///   +---------------------------------------------------------------+
///   |                     Total Length (16)                         |
///   +---------------------------------------------------------------+
///   |                   Identification (16)                         |
///   +---------------------------------------------------------------+
///   |Flags (3)|         Fragment Offset (13)                        |
///   +---------------------------------------------------------------+
///   |   TTL (8)   |   Protocol (8)    |    Header Checksum (16)     |
///   +---------------------------------------------------------------+
///   |                   Source IP Address (32)                      |
///   +---------------------------------------------------------------+
///   |                Destination IP Address (32)                    |
///   +---------------------------------------------------------------+
///   |             Options (if IHL > 5; Variable length)             |
///   +---------------------------------------------------------------+
///
/// The view covers at least the fixed 20 bytes. Options are only reachable
/// when the caller handed in the full `ihl * 4` bytes.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Header<'a> {
    bytes: &'a [u8],
}

impl<'a> Ipv4Header<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < IPV4_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    /// IP version (4 for a well-formed header).
    pub fn version(&self) -> u8 {
        self.bytes[0] >> 4
    }

    /// Internet Header Length in 32-bit words.
    pub fn ihl(&self) -> u8 {
        self.bytes[0] & 0x0f
    }

    pub fn header_len(&self) -> usize {
        usize::from(self.ihl()) * 4
    }

    pub fn dscp(&self) -> u8 {
        self.bytes[1] >> 2
    }

    pub fn ecn(&self) -> u8 {
        self.bytes[1] & 0x03
    }

    /// Header plus payload, in bytes.
    pub fn total_length(&self) -> u16 {
        self.field(2)
    }

    pub fn identification(&self) -> u16 {
        self.field(4)
    }

    /// Raw flags and fragment offset word.
    pub fn frag_off(&self) -> u16 {
        self.field(6)
    }

    pub fn more_fragments(&self) -> bool {
        self.frag_off() & FLAG_MORE_FRAGMENTS != 0
    }

    pub fn dont_fragment(&self) -> bool {
        self.frag_off() & FLAG_DONT_FRAGMENT != 0
    }

    /// Fragment offset in 8-byte units.
    pub fn fragment_offset(&self) -> u16 {
        self.frag_off() & FRAGMENT_OFFSET_MASK
    }

    pub fn ttl(&self) -> u8 {
        self.bytes[8]
    }

    pub fn protocol(&self) -> u8 {
        self.bytes[9]
    }

    pub fn checksum(&self) -> u16 {
        self.field(10)
    }

    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.bytes[12], self.bytes[13], self.bytes[14], self.bytes[15])
    }

    pub fn destination(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.bytes[16], self.bytes[17], self.bytes[18], self.bytes[19])
    }

    pub fn options(&self) -> Option<&'a [u8]> {
        let end = self.header_len();
        if end <= IPV4_HEADER_LEN {
            return None;
        }
        self.bytes.get(IPV4_HEADER_LEN..end)
    }

    fn field(&self, offset: usize) -> u16 {
        be16_at(self.bytes, offset).unwrap_or_default()
    }
}

pub(crate) fn write_total_length(header: &mut [u8], total_length: u16) -> Option<()> {
    put_be16(header, 2, total_length)
}

pub(crate) fn write_protocol(header: &mut [u8], protocol: u8) -> Option<()> {
    *header.get_mut(9)? = protocol;
    Some(())
}

/// Recomputes the header checksum over `header`, which must be exactly the
/// `ihl * 4` header bytes.
pub(crate) fn write_checksum(header: &mut [u8]) -> Option<()> {
    put_be16(header, 10, 0)?;
    let sum = ipv4_checksum(header);
    put_be16(header, 10, sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_ipv4_header() -> Vec<u8> {
        vec![
            0x45, // Version 4, IHL 5.
            0x00, // DSCP and ECN.
            0x00, 0x28, // Total Length = 40 bytes.
            0x12, 0x34, // Identification.
            0x40, 0x00, // Flags (DF) and Fragment Offset (0).
            64,   // TTL.
            6,    // Protocol (TCP).
            0x00, 0x00, // Checksum placeholder.
            192, 168, 1, 1, // Source IP: 192.168.1.1.
            192, 168, 1, 2, // Destination IP: 192.168.1.2.
        ]
    }

    #[test]
    fn reads_fixed_fields() {
        let header = create_ipv4_header();
        let ipv4 = Ipv4Header::new(&header).expect("20 bytes is a full header");

        assert_eq!(ipv4.version(), 4);
        assert_eq!(ipv4.ihl(), 5);
        assert_eq!(ipv4.header_len(), 20);
        assert_eq!(ipv4.total_length(), 40);
        assert_eq!(ipv4.identification(), 0x1234);
        assert!(ipv4.dont_fragment());
        assert!(!ipv4.more_fragments());
        assert_eq!(ipv4.fragment_offset(), 0);
        assert_eq!(ipv4.ttl(), 64);
        assert_eq!(ipv4.protocol(), 6);
        assert_eq!(ipv4.source(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(ipv4.destination(), Ipv4Addr::new(192, 168, 1, 2));
        assert!(ipv4.options().is_none());
    }

    #[test]
    fn exposes_options_when_ihl_covers_them() {
        let mut header = create_ipv4_header();
        header[0] = 0x46;
        header.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        let ipv4 = Ipv4Header::new(&header).expect("24 bytes is a full header");
        assert_eq!(ipv4.options(), Some(&[0x01, 0x02, 0x03, 0x04][..]));
    }

    #[test]
    fn fragment_bits_are_split() {
        let mut header = create_ipv4_header();
        header[6] = 0x20;
        header[7] = 0x05;
        let ipv4 = Ipv4Header::new(&header).expect("full header");
        assert!(ipv4.more_fragments());
        assert_eq!(ipv4.fragment_offset(), 5);
    }

    #[test]
    fn writers_fill_length_protocol_and_checksum() {
        let mut header = create_ipv4_header();
        write_total_length(&mut header, 60).expect("field in range");
        write_protocol(&mut header, 17).expect("field in range");
        write_checksum(&mut header).expect("field in range");

        let ipv4 = Ipv4Header::new(&header).expect("full header");
        assert_eq!(ipv4.total_length(), 60);
        assert_eq!(ipv4.protocol(), 17);
        assert_ne!(ipv4.checksum(), 0);
        assert_eq!(ipv4_checksum(&header), 0);
    }

    #[test]
    fn short_slice_has_no_view() {
        assert!(Ipv4Header::new(&[0x45, 0x00, 0x00, 0x14]).is_none());
    }
}
