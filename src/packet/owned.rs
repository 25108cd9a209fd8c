use std::fmt;
use std::ops::Range;

use super::stack::{HeaderKind, HeaderRecord, HeaderStack};
use crate::engine::constants::DEFAULT_MAX_HEADERS;
use crate::engine::error::ComposeError;
use crate::layer::network::icmp::IcmpHeader;
use crate::layer::network::icmpv6::Icmpv6Header;
use crate::layer::network::ipv4::Ipv4Header;
use crate::layer::network::ipv6::Ipv6Header;
use crate::layer::transport::tcp::TcpHeader;
use crate::layer::transport::udp::UdpHeader;

/// Indices into the header stack of the innermost IP and transport headers.
///
/// An IP header is only primary when it directly carries the transport
/// header; IP headers that wrap another tunnel never are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimaryHeaders {
    pub ipv4: Option<usize>,
    pub ipv6: Option<usize>,
    pub transport: Option<usize>,
}

/// One packet: a fixed-capacity byte buffer and the headers found in it (or
/// composed into it).
#[derive(Debug, Clone)]
pub struct Packet {
    buffer: Vec<u8>,
    capacity: usize,
    pub(crate) headers: HeaderStack,
    pub(crate) l2_header_bytes: usize,
    pub(crate) ip_bytes: Option<usize>,
    pub(crate) primary: PrimaryHeaders,
}

impl Packet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_limits(capacity, DEFAULT_MAX_HEADERS)
    }

    pub fn with_limits(capacity: usize, max_headers: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            headers: HeaderStack::with_capacity(max_headers),
            l2_header_bytes: 0,
            ip_bytes: None,
            primary: PrimaryHeaders::default(),
        }
    }

    /// A fully populated packet, e.g. one just read off the wire.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let buffer = bytes.into();
        let capacity = buffer.len();
        Self {
            buffer,
            ..Self::with_capacity(capacity)
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes populated so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn headers(&self) -> &HeaderStack {
        &self.headers
    }

    pub fn l2_header_bytes(&self) -> usize {
        self.l2_header_bytes
    }

    /// Total length of the outermost IP datagram, once one was decoded.
    pub fn ip_bytes(&self) -> Option<usize> {
        self.ip_bytes
    }

    pub fn primary(&self) -> PrimaryHeaders {
        self.primary
    }

    pub fn header_slice(&self, record: &HeaderRecord) -> Option<&[u8]> {
        let end = record.offset.checked_add(record.header_bytes)?;
        self.buffer.get(record.offset..end)
    }

    pub fn primary_ipv4(&self) -> Option<&HeaderRecord> {
        self.headers.get(self.primary.ipv4?)
    }

    pub fn primary_ipv6(&self) -> Option<&HeaderRecord> {
        self.headers.get(self.primary.ipv6?)
    }

    pub fn transport(&self) -> Option<&HeaderRecord> {
        self.headers.get(self.primary.transport?)
    }

    pub fn ipv4(&self) -> Option<Ipv4Header<'_>> {
        Ipv4Header::new(self.header_slice(self.primary_ipv4()?)?)
    }

    pub fn ipv6(&self) -> Option<Ipv6Header<'_>> {
        Ipv6Header::new(self.header_slice(self.primary_ipv6()?)?)
    }

    pub fn tcp(&self) -> Option<TcpHeader<'_>> {
        TcpHeader::new(self.transport_slice(HeaderKind::Tcp)?)
    }

    pub fn udp(&self) -> Option<UdpHeader<'_>> {
        UdpHeader::new(self.transport_slice(HeaderKind::Udp)?)
    }

    pub fn icmpv4(&self) -> Option<IcmpHeader<'_>> {
        IcmpHeader::new(self.transport_slice(HeaderKind::Icmpv4)?)
    }

    pub fn icmpv6(&self) -> Option<Icmpv6Header<'_>> {
        Icmpv6Header::new(self.transport_slice(HeaderKind::Icmpv6)?)
    }

    fn transport_slice(&self, kind: HeaderKind) -> Option<&[u8]> {
        let record = self.transport().filter(|record| record.kind == kind)?;
        self.header_slice(record)
    }

    pub fn hex_dump(&self) -> String {
        hex_dump(&self.buffer)
    }

    /// Appends bytes at the end of the populated region, returning the
    /// offset they start at.
    pub(crate) fn extend(&mut self, bytes: &[u8]) -> Result<usize, ComposeError> {
        let offset = self.buffer.len();
        let needed = offset + bytes.len();
        if needed > self.capacity {
            return Err(ComposeError::BufferFull {
                needed,
                capacity: self.capacity,
            });
        }
        self.buffer.extend_from_slice(bytes);
        Ok(offset)
    }

    pub(crate) fn bytes_mut(&mut self, range: Range<usize>) -> Option<&mut [u8]> {
        self.buffer.get_mut(range)
    }

    /// Forgets the result of any previous decode so the buffer can be
    /// parsed again.
    pub(crate) fn reset_decode_state(&mut self) {
        self.headers.clear();
        self.l2_header_bytes = 0;
        self.ip_bytes = None;
        self.primary = PrimaryHeaders::default();
    }
}

/// Sixteen bytes per line: offset, hex, then printable ASCII.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();

    for (line, chunk) in bytes.chunks(16).enumerate() {
        let mut hex_part = String::new();
        let mut ascii_part = String::new();

        for i in 0..16 {
            match chunk.get(i) {
                Some(&byte) => {
                    hex_part.push_str(&format!("{:02x} ", byte));
                    ascii_part.push(if (32..=126).contains(&byte) {
                        byte as char
                    } else {
                        '.'
                    });
                }
                None => hex_part.push_str("   "),
            }
        }

        out.push_str(&format!(
            "{:04x}   {:<48}  {}\n",
            line * 16,
            hex_part,
            ascii_part
        ));
    }

    out
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex_dump())
    }
}
