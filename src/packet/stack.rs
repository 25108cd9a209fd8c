use std::fmt;

use crate::engine::constants::{ethertype, ip_proto};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Ethernet,
    Ipv4,
    Ipv6,
    Tcp,
    Udp,
    Icmpv4,
    Icmpv6,
    Gre,
    Mpls,
}

impl HeaderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ethernet => "ETHERNET",
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Icmpv4 => "ICMPV4",
            Self::Icmpv6 => "ICMPV6",
            Self::Gre => "GRE",
            Self::Mpls => "MPLS",
        }
    }

    /// EtherType announcing this header inside Ethernet or GRE.
    pub fn ethertype(self) -> Option<u16> {
        match self {
            Self::Ipv4 => Some(ethertype::IPV4),
            Self::Ipv6 => Some(ethertype::IPV6),
            Self::Mpls => Some(ethertype::MPLS_UNICAST),
            _ => None,
        }
    }

    /// IP protocol number announcing this header inside IPv4 or IPv6.
    pub fn ip_protocol(self) -> Option<u8> {
        match self {
            Self::Ipv4 => Some(ip_proto::IPIP),
            Self::Ipv6 => Some(ip_proto::IPV6),
            Self::Tcp => Some(ip_proto::TCP),
            Self::Udp => Some(ip_proto::UDP),
            Self::Icmpv4 => Some(ip_proto::ICMP),
            Self::Icmpv6 => Some(ip_proto::ICMPV6),
            Self::Gre => Some(ip_proto::GRE),
            Self::Ethernet | Self::Mpls => None,
        }
    }

    /// Transport headers end the nesting; nothing is decoded inside them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Tcp | Self::Udp | Self::Icmpv4 | Self::Icmpv6)
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded or composed header and the byte extent it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRecord {
    pub kind: HeaderKind,
    pub offset: usize,
    pub header_bytes: usize,
    /// This header plus everything it encapsulates.
    pub total_bytes: usize,
}

impl HeaderRecord {
    /// Offset of the first byte after this header, where the next one starts.
    pub fn inner_offset(&self) -> usize {
        self.offset + self.header_bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("too many headers")]
pub struct TooManyHeaders;

/// Outer-to-inner headers of one packet, append-only for one pass.
#[derive(Debug, Clone)]
pub struct HeaderStack {
    records: Vec<HeaderRecord>,
    capacity: usize,
}

impl HeaderStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Registers a header directly after the previous one and returns its
    /// index. `total_bytes` starts at zero until the caller fills it in.
    pub fn append(&mut self, kind: HeaderKind, header_bytes: usize) -> Result<usize, TooManyHeaders> {
        if self.records.len() >= self.capacity {
            return Err(TooManyHeaders);
        }
        let offset = self
            .records
            .last()
            .map(HeaderRecord::inner_offset)
            .unwrap_or(0);
        self.records.push(HeaderRecord {
            kind,
            offset,
            header_bytes,
            total_bytes: 0,
        });
        Ok(self.records.len() - 1)
    }

    pub fn innermost(&self) -> Option<&HeaderRecord> {
        self.records.last()
    }

    pub fn get(&self, index: usize) -> Option<&HeaderRecord> {
        self.records.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut HeaderRecord> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[HeaderRecord] {
        &self.records
    }

    pub fn kinds(&self) -> Vec<HeaderKind> {
        self.records.iter().map(|record| record.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.records.len())
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
