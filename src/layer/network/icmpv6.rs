use crate::engine::constants::ICMPV6_HEADER_LEN;
use crate::layer::checksum::be16_at;

/// ICMPv6 header (RFC 4443). Same leading layout as ICMPv4; the checksum
/// covers an IPv6 pseudo-header and is not verified here.
#[derive(Debug, Clone, Copy)]
pub struct Icmpv6Header<'a> {
    bytes: &'a [u8],
}

impl<'a> Icmpv6Header<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < ICMPV6_HEADER_LEN {
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

    pub fn message_body(&self) -> &'a [u8] {
        &self.bytes[4..]
    }

    pub fn is_error(&self) -> bool {
        self.icmp_type() < 128
    }
}

#[cfg(test)]
mod tests {
    use super::Icmpv6Header;

    #[test]
    fn reads_echo_request() {
        let bytes = [128, 0, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00];
        let icmp = Icmpv6Header::new(&bytes).expect("8 bytes is a full header");
        assert_eq!(icmp.icmp_type(), 128);
        assert_eq!(icmp.icmp_code(), 0);
        assert!(!icmp.is_error());
        assert_eq!(icmp.message_body().len(), 4);
    }
}
