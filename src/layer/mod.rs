//! Borrowed wire views over single protocol headers.
//!
//! Each view checks once, at construction, that the slice is long enough for
//! the fixed part of its header; accessors then decode big-endian fields
//! directly from the buffer. The parsers in `engine::builtin` decide whether
//! a header is acceptable; the views only read and write fields.

pub mod checksum;
pub mod datalink; // Layer 2 - Ethernet
pub mod network; // Layer 3 - IPv4/IPv6, ICMPv4/ICMPv6
pub mod transport; // Layer 4 - TCP/UDP
pub mod tunnel; // GRE, MPLS
