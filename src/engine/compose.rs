//! Building packets header by header.
//!
//! Headers are appended outside-in, each returning a [`PendingHeader`]. Once
//! everything a header encapsulates has been appended and finished, the
//! pending header is passed to [`PacketBuilder::finish_header`] together with
//! the handle of the header directly inside it; that fills in the length and
//! next-protocol fields that could not be known at append time.
//!
//! ```
//! use hdrstack::engine::PacketBuilder;
//! use hdrstack::packet::HeaderKind;
//!
//! let mut builder = PacketBuilder::new(128);
//! let ip = builder.append_header(HeaderKind::Ipv4, &[
//!     0x45, 0, 0, 0, 0, 1, 0, 0, 64, 0, 0, 0, 10, 0, 0, 1, 10, 0, 0, 2,
//! ])?;
//! let udp = builder.append_header(HeaderKind::Udp, &[0x04, 0xd2, 0x00, 0x35, 0, 0, 0, 0])?;
//! builder.append_payload(b"ping")?;
//! let udp = builder.finish_header(udp, None)?;
//! builder.finish_header(ip, Some(&udp))?;
//! let packet = builder.build()?;
//! assert_eq!(packet.len(), 32);
//! # Ok::<(), hdrstack::engine::ComposeError>(())
//! ```

use tracing::trace;

use super::constants::{
    ETHERNET_HEADER_LEN, GRE_HEADER_LEN, ICMPV4_HEADER_LEN, ICMPV6_HEADER_LEN, IPV4_HEADER_LEN,
    IPV6_HEADER_LEN, MPLS_ENTRY_LEN, TCP_HEADER_LEN, UDP_HEADER_LEN,
};
use super::error::ComposeError;
use crate::layer::datalink::ethernet::write_ethertype;
use crate::layer::network::ipv4::{self, Ipv4Header};
use crate::layer::network::ipv6;
use crate::layer::transport::tcp::TcpHeader;
use crate::layer::transport::udp;
use crate::layer::tunnel::gre::{self, GreHeader};
use crate::layer::tunnel::mpls::{MplsEntry, MplsStack};
use crate::packet::{HeaderKind, HeaderRecord, Packet, TooManyHeaders};

/// A header whose length and next-protocol fields are still placeholders.
///
/// Not `Clone`: each one is consumed by exactly one
/// call to [`PacketBuilder::finish_header`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending header must be finished"]
pub struct PendingHeader {
    index: usize,
    kind: HeaderKind,
}

impl PendingHeader {
    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// A finished header, usable as the inner header of the one around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderHandle {
    index: usize,
    kind: HeaderKind,
}

impl HeaderHandle {
    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct PacketBuilder {
    packet: Packet,
    open: Vec<bool>,
    payload_started: bool,
    sealed: bool,
}

impl PacketBuilder {
    pub fn new(capacity: usize) -> Self {
        Self::from_packet(Packet::with_capacity(capacity))
    }

    pub fn with_limits(capacity: usize, max_headers: usize) -> Self {
        Self::from_packet(Packet::with_limits(capacity, max_headers))
    }

    fn from_packet(packet: Packet) -> Self {
        Self {
            packet,
            open: Vec::new(),
            payload_started: false,
            sealed: false,
        }
    }

    /// The packet as built so far; finished headers already carry their
    /// final `total_bytes`.
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    /// Appends caller-formed header bytes after the previous header.
    ///
    /// Length fields are checked against `bytes.len()` where the header
    /// declares its own length (IPv4 IHL, TCP data offset, GRE flags).
    /// Nothing is modified on failure.
    pub fn append_header(
        &mut self,
        kind: HeaderKind,
        bytes: &[u8],
    ) -> Result<PendingHeader, ComposeError> {
        check_header_length(kind, bytes)?;
        self.push_header(kind, bytes)
    }

    /// Appends a basic four-byte GRE header with no optional fields.
    pub fn append_gre(&mut self) -> Result<PendingHeader, ComposeError> {
        self.push_header(HeaderKind::Gre, &[0u8; GRE_HEADER_LEN])
    }

    /// Appends a whole label stack as one MPLS header.
    pub fn append_mpls(&mut self, stack: &MplsStack) -> Result<PendingHeader, ComposeError> {
        if stack.is_empty() {
            return Err(ComposeError::EmptyMplsStack);
        }
        self.push_header(HeaderKind::Mpls, &stack.to_bytes())
    }

    /// Appends one label stack entry as its own MPLS header, validating the
    /// fields first.
    pub fn append_mpls_entry(
        &mut self,
        label: i64,
        traffic_class: i64,
        is_stack_bottom: bool,
        ttl: i64,
    ) -> Result<PendingHeader, ComposeError> {
        let entry = MplsEntry::encode(label, traffic_class, is_stack_bottom, ttl)?;
        self.push_header(HeaderKind::Mpls, &entry.to_bytes())
    }

    /// Appends bytes after the innermost header. No header may follow, and
    /// nothing may be appended once any header is finished.
    pub fn append_payload(&mut self, bytes: &[u8]) -> Result<(), ComposeError> {
        if self.sealed {
            return Err(ComposeError::AppendAfterFinish);
        }
        self.packet.extend(bytes)?;
        self.payload_started = true;
        Ok(())
    }

    /// Fills in the fields of `pending` that depend on what it carries.
    ///
    /// Transport headers take no inner header and span everything appended
    /// after them. Every other kind needs the finished handle of the header
    /// directly inside it. Once any header is finished, nothing more can be
    /// appended.
    pub fn finish_header(
        &mut self,
        pending: PendingHeader,
        inner: Option<&HeaderHandle>,
    ) -> Result<HeaderHandle, ComposeError> {
        let record = self
            .packet
            .headers
            .get(pending.index)
            .copied()
            .filter(|record| {
                record.kind == pending.kind && self.open.get(pending.index) == Some(&true)
            })
            .ok_or(ComposeError::ForeignHeader {
                index: pending.index,
                kind: pending.kind,
            })?;

        let total_bytes = match (pending.kind.is_terminal(), inner) {
            (true, Some(_)) => return Err(ComposeError::TerminalWithInner(pending.kind)),
            (true, None) => {
                let total = self.packet.len().saturating_sub(record.offset);
                if pending.kind == HeaderKind::Udp {
                    let length = field_u16(HeaderKind::Udp, total)?;
                    let header = self.header_mut(&record)?;
                    udp::write_length(header, length).ok_or_else(|| bad_length(&record))?;
                }
                total
            }
            (false, None) => return Err(ComposeError::MissingInner(pending.kind)),
            (false, Some(inner)) => self.finish_encapsulating(pending.index, &record, inner)?,
        };

        if let Some(record) = self.packet.headers.get_mut(pending.index) {
            record.total_bytes = total_bytes;
        }
        if let Some(open) = self.open.get_mut(pending.index) {
            *open = false;
        }
        self.sealed = true;
        trace!(
            "finished {} header at {}: {} bytes",
            pending.kind, record.offset, total_bytes
        );
        Ok(HeaderHandle {
            index: pending.index,
            kind: pending.kind,
        })
    }

    /// Hands back the packet once every appended header is finished.
    pub fn build(self) -> Result<Packet, ComposeError> {
        let unfinished = self.open.iter().filter(|open| **open).count();
        if unfinished != 0 {
            return Err(ComposeError::Unfinished(unfinished));
        }
        Ok(self.packet)
    }

    fn push_header(
        &mut self,
        kind: HeaderKind,
        bytes: &[u8],
    ) -> Result<PendingHeader, ComposeError> {
        if self.sealed {
            return Err(ComposeError::AppendAfterFinish);
        }
        if self.payload_started {
            return Err(ComposeError::HeaderAfterPayload);
        }
        let last_kind = self.packet.headers.innermost().map(|last| last.kind);
        if let Some(last) = last_kind.filter(|kind| kind.is_terminal()) {
            return Err(ComposeError::HeaderAfterTerminal(last));
        }
        if self.packet.headers.remaining() == 0 {
            return Err(TooManyHeaders.into());
        }
        self.packet.extend(bytes)?;
        let index = self.packet.headers.append(kind, bytes.len())?;
        self.open.push(true);
        Ok(PendingHeader { index, kind })
    }

    /// Writes the outer header's fields for `inner` and returns its total
    /// length. Fields are computed before any byte is written.
    fn finish_encapsulating(
        &mut self,
        index: usize,
        record: &HeaderRecord,
        inner: &HeaderHandle,
    ) -> Result<usize, ComposeError> {
        let outer = record.kind;
        let inner_record = self
            .packet
            .headers
            .get(inner.index)
            .filter(|inner_record| inner.index == index + 1 && inner_record.kind == inner.kind)
            .copied()
            .ok_or(ComposeError::NotDirectlyNested {
                outer,
                inner: inner.kind,
            })?;
        let total = record.header_bytes + inner_record.total_bytes;
        let unsupported = ComposeError::UnsupportedInner {
            outer,
            inner: inner.kind,
        };

        match outer {
            HeaderKind::Ethernet => {
                let ethertype = inner.kind.ethertype().ok_or(unsupported)?;
                let header = self.header_mut(record)?;
                write_ethertype(header, ethertype).ok_or_else(|| bad_length(record))?;
            }
            HeaderKind::Ipv4 => {
                let protocol = inner.kind.ip_protocol().ok_or(unsupported)?;
                let total_length = field_u16(outer, total)?;
                let header = self.header_mut(record)?;
                ipv4::write_total_length(header, total_length).ok_or_else(|| bad_length(record))?;
                ipv4::write_protocol(header, protocol).ok_or_else(|| bad_length(record))?;
                ipv4::write_checksum(header).ok_or_else(|| bad_length(record))?;
            }
            HeaderKind::Ipv6 => {
                let next_header = inner.kind.ip_protocol().ok_or(unsupported)?;
                let payload_length = field_u16(outer, inner_record.total_bytes)?;
                let header = self.header_mut(record)?;
                ipv6::write_payload_length(header, payload_length)
                    .ok_or_else(|| bad_length(record))?;
                ipv6::write_next_header(header, next_header).ok_or_else(|| bad_length(record))?;
            }
            HeaderKind::Gre => {
                let ethertype = inner.kind.ethertype().ok_or(unsupported)?;
                let header = self.header_mut(record)?;
                gre::write_protocol_type(header, ethertype).ok_or_else(|| bad_length(record))?;
            }
            HeaderKind::Mpls => {
                if !matches!(inner.kind, HeaderKind::Ipv4 | HeaderKind::Ipv6) {
                    return Err(unsupported);
                }
            }
            HeaderKind::Tcp | HeaderKind::Udp | HeaderKind::Icmpv4 | HeaderKind::Icmpv6 => {
                return Err(ComposeError::TerminalWithInner(outer));
            }
        }
        Ok(total)
    }

    fn header_mut(&mut self, record: &HeaderRecord) -> Result<&mut [u8], ComposeError> {
        self.packet
            .bytes_mut(record.offset..record.inner_offset())
            .ok_or_else(|| bad_length(record))
    }
}

fn check_header_length(kind: HeaderKind, bytes: &[u8]) -> Result<(), ComposeError> {
    let len = bytes.len();
    let valid = match kind {
        HeaderKind::Ethernet => len == ETHERNET_HEADER_LEN,
        HeaderKind::Ipv4 => {
            Ipv4Header::new(bytes).is_some_and(|ip| ip.header_len() == len && len >= IPV4_HEADER_LEN)
        }
        HeaderKind::Ipv6 => len == IPV6_HEADER_LEN,
        HeaderKind::Tcp => {
            TcpHeader::new(bytes).is_some_and(|tcp| tcp.header_len() == len && len >= TCP_HEADER_LEN)
        }
        HeaderKind::Udp => len == UDP_HEADER_LEN,
        HeaderKind::Icmpv4 => len == ICMPV4_HEADER_LEN,
        HeaderKind::Icmpv6 => len == ICMPV6_HEADER_LEN,
        HeaderKind::Gre => GreHeader::new(bytes)
            .is_some_and(|gre| gre.header_len() == len && !gre.has_routing()),
        HeaderKind::Mpls => len >= MPLS_ENTRY_LEN && len % MPLS_ENTRY_LEN == 0,
    };
    if valid {
        Ok(())
    } else {
        Err(ComposeError::BadHeaderLength { kind, len })
    }
}

fn field_u16(outer: HeaderKind, len: usize) -> Result<u16, ComposeError> {
    u16::try_from(len).map_err(|_| ComposeError::LengthOverflow { outer, len })
}

fn bad_length(record: &HeaderRecord) -> ComposeError {
    ComposeError::BadHeaderLength {
        kind: record.kind,
        len: record.header_bytes,
    }
}
