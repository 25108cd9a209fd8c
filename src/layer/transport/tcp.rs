use crate::engine::constants::TCP_HEADER_LEN;
use crate::layer::checksum::{be16_at, be32_at};

/// TCP Flags as defined in RFC 793
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TcpFlags {
    pub fin: bool, // 0x01 - Finish, no more data from sender
    pub syn: bool, // 0x02 - Synchronize sequence numbers
    pub rst: bool, // 0x04 - Reset the connection
    pub psh: bool, // 0x08 - Push function
    pub ack: bool, // 0x10 - Acknowledgment field is significant
    pub urg: bool, // 0x20 - Urgent pointer field is significant
    pub ece: bool, // 0x40 - ECN-Echo
    pub cwr: bool, // 0x80 - Congestion Window Reduced
    pub ns: bool,  // 0x100 - ECN-nonce concealment protection (RFC 3540)
}

impl TcpFlags {
    fn from_bits(bits: u16) -> Self {
        Self {
            fin: bits & 0x001 != 0,
            syn: bits & 0x002 != 0,
            rst: bits & 0x004 != 0,
            psh: bits & 0x008 != 0,
            ack: bits & 0x010 != 0,
            urg: bits & 0x020 != 0,
            ece: bits & 0x040 != 0,
            cwr: bits & 0x080 != 0,
            ns: bits & 0x100 != 0,
        }
    }
}

/// Represents a TCP packet header.
///
/// The TCP header format is defined in RFC 793 and consists of:
/// - Source Port (16 bits)
/// - Destination Port (16 bits)
/// - Sequence Number (32 bits)
/// - Acknowledgment Number (32 bits)
/// - Data Offset (4 bits): Size of TCP header in 32-bit words
/// - Reserved (3 bits)
/// - Flags (9 bits): NS, CWR, ECE, URG, ACK, PSH, RST, SYN, FIN
/// - Window Size (16 bits)
/// - Checksum (16 bits)
/// - Urgent Pointer (16 bits)
/// - Options (variable length, optional)
#[derive(Debug, Clone, Copy)]
pub struct TcpHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> TcpHeader<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < TCP_HEADER_LEN {
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

    pub fn sequence_number(&self) -> u32 {
        be32_at(self.bytes, 4).unwrap_or_default()
    }

    pub fn acknowledgment_number(&self) -> u32 {
        be32_at(self.bytes, 8).unwrap_or_default()
    }

    /// Header length in 32-bit words.
    pub fn data_offset(&self) -> u8 {
        self.bytes[12] >> 4
    }

    pub fn header_len(&self) -> usize {
        usize::from(self.data_offset()) * 4
    }

    pub fn flags(&self) -> TcpFlags {
        let bits = (u16::from(self.bytes[12] & 0x01) << 8) | u16::from(self.bytes[13]);
        TcpFlags::from_bits(bits)
    }

    pub fn window_size(&self) -> u16 {
        be16_at(self.bytes, 14).unwrap_or_default()
    }

    pub fn checksum(&self) -> u16 {
        be16_at(self.bytes, 16).unwrap_or_default()
    }

    pub fn urgent_pointer(&self) -> u16 {
        be16_at(self.bytes, 18).unwrap_or_default()
    }

    pub fn options(&self) -> Option<&'a [u8]> {
        let end = self.header_len();
        if end <= TCP_HEADER_LEN {
            return None;
        }
        self.bytes.get(TCP_HEADER_LEN..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_syn_ack_segment() {
        let bytes = [
            0x00, 0x50, 0x01, 0xbb, // sport 80, dport 443
            0x00, 0x00, 0x00, 0x01, // seq
            0x00, 0x00, 0x00, 0x02, // ack
            0x50, 0x12, 0x10, 0x00, // data offset 5, SYN+ACK, window
            0xab, 0xcd, 0x00, 0x00, // checksum/urg
        ];
        let tcp = TcpHeader::new(&bytes).expect("20 bytes is a full header");
        assert_eq!(tcp.source_port(), 80);
        assert_eq!(tcp.destination_port(), 443);
        assert_eq!(tcp.sequence_number(), 1);
        assert_eq!(tcp.acknowledgment_number(), 2);
        assert_eq!(tcp.data_offset(), 5);
        assert_eq!(tcp.header_len(), 20);
        let flags = tcp.flags();
        assert!(flags.syn && flags.ack);
        assert!(!flags.fin && !flags.ns);
        assert_eq!(tcp.window_size(), 0x1000);
        assert_eq!(tcp.checksum(), 0xabcd);
        assert!(tcp.options().is_none());
    }

    #[test]
    fn options_follow_fixed_header() {
        let mut bytes = vec![0u8; 24];
        bytes[12] = 0x60;
        bytes[20..24].copy_from_slice(&[0x02, 0x04, 0x05, 0xb4]);
        let tcp = TcpHeader::new(&bytes).expect("full header");
        assert_eq!(tcp.options(), Some(&[0x02, 0x04, 0x05, 0xb4][..]));
    }
}
