//! GRE (Generic Routing Encapsulation), RFC 2784 with the RFC 2890 key and
//! sequence number extensions.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |C|R|K|S|s|Recur|  Flags  | Ver |         Protocol Type         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      Checksum (optional)      |       Offset (optional)       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Key (optional)                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                  Sequence Number (optional)                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The checksum/offset word is present when either C or R is set.

use crate::engine::constants::GRE_HEADER_LEN;
use crate::layer::checksum::{be16_at, be32_at, put_be16};

pub const FLAG_CHECKSUM: u16 = 0x8000;
pub const FLAG_ROUTING: u16 = 0x4000;
pub const FLAG_KEY: u16 = 0x2000;
pub const FLAG_SEQUENCE: u16 = 0x1000;
pub const VERSION_MASK: u16 = 0x0007;

#[derive(Debug, Clone, Copy)]
pub struct GreHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> GreHeader<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < GRE_HEADER_LEN {
            return None;
        }
        Some(Self { bytes })
    }

    pub fn flags_version(&self) -> u16 {
        be16_at(self.bytes, 0).unwrap_or_default()
    }

    pub fn version(&self) -> u8 {
        (self.flags_version() & VERSION_MASK) as u8
    }

    pub fn has_checksum(&self) -> bool {
        self.flags_version() & FLAG_CHECKSUM != 0
    }

    pub fn has_routing(&self) -> bool {
        self.flags_version() & FLAG_ROUTING != 0
    }

    pub fn has_key(&self) -> bool {
        self.flags_version() & FLAG_KEY != 0
    }

    pub fn has_sequence(&self) -> bool {
        self.flags_version() & FLAG_SEQUENCE != 0
    }

    /// EtherType of the encapsulated payload.
    pub fn protocol_type(&self) -> u16 {
        be16_at(self.bytes, 2).unwrap_or_default()
    }

    /// Header length implied by the flag bits, optional words included.
    pub fn header_len(&self) -> usize {
        let mut len = GRE_HEADER_LEN;
        if self.has_checksum() || self.has_routing() {
            len += 4;
        }
        if self.has_key() {
            len += 4;
        }
        if self.has_sequence() {
            len += 4;
        }
        len
    }

    pub fn checksum(&self) -> Option<u16> {
        if !self.has_checksum() {
            return None;
        }
        be16_at(self.bytes, GRE_HEADER_LEN)
    }

    pub fn key(&self) -> Option<u32> {
        if !self.has_key() {
            return None;
        }
        be32_at(self.bytes, self.key_offset())
    }

    pub fn sequence_number(&self) -> Option<u32> {
        if !self.has_sequence() {
            return None;
        }
        let offset = self.key_offset() + if self.has_key() { 4 } else { 0 };
        be32_at(self.bytes, offset)
    }

    fn key_offset(&self) -> usize {
        if self.has_checksum() || self.has_routing() {
            GRE_HEADER_LEN + 4
        } else {
            GRE_HEADER_LEN
        }
    }
}

pub(crate) fn write_protocol_type(header: &mut [u8], ethertype: u16) -> Option<()> {
    put_be16(header, 2, ethertype)
}
