use crate::engine::constants::ICMPV4_HEADER_LEN;
use crate::layer::checksum::{be16_at, be32_at};

/// Represents the basic fields of an ICMP header.
///
/// The ICMP header has the following layout:
///
///   0                   1                   2                   3
///    0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///   +---------------------------------------------------------------+
///   |     Type      |     Code      |           Checksum            |
///   +---------------------------------------------------------------+
///   |           Rest of Header (variable, depends on type and code) |
///   +---------------------------------------------------------------+
///   |                       Data (variable length)                  |
///   +---------------------------------------------------------------+
#[derive(Debug, Clone, Copy)]
pub struct IcmpHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> IcmpHeader<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < ICMPV4_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    pub fn icmp_type(&self) -> u8 {
        self.bytes[0]
    }

    pub fn icmp_code(&self) -> u8 {
        self.bytes[1]
    }

    pub fn checksum(&self) -> u16 {
        be16_at(self.bytes, 2).unwrap_or_default()
    }

    /// Identifier/sequence for echo, unused/MTU for errors.
    pub fn rest_of_header(&self) -> u32 {
        be32_at(self.bytes, 4).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::IcmpHeader;

    #[test]
    fn reads_echo_request() {
        let bytes = [8, 0, 0xf7, 0xff, 0x00, 0x01, 0x00, 0x02];
        let icmp = IcmpHeader::new(&bytes).expect("8 bytes is a full header");
        assert_eq!(icmp.icmp_type(), 8);
        assert_eq!(icmp.icmp_code(), 0);
        assert_eq!(icmp.checksum(), 0xf7ff);
        assert_eq!(icmp.rest_of_header(), 0x0001_0002);
    }

    #[test]
    fn short_slice_has_no_view() {
        assert!(IcmpHeader::new(&[8, 0, 0, 0]).is_none());
    }
}
