use crate::layer::tunnel::mpls::MplsFieldError;
use crate::packet::{HeaderKind, TooManyHeaders};

/// Why a buffer was rejected as malformed. Messages are stable text so
/// expected-output scripts can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Ethernet header overflows packet")]
    EthernetHeaderOverflow,
    #[error("IPv4 header overflows packet")]
    Ipv4HeaderOverflow,
    #[error("Bad IP version for ETHERTYPE_IP")]
    BadIpv4Version,
    #[error("IPv6 header overflows packet")]
    Ipv6HeaderOverflow,
    #[error("Bad IP version for ETHERTYPE_IPV6")]
    BadIpv6Version,
    #[error("IP header overflows packet")]
    IpHeaderOverflow,
    #[error("Unsupported IP version")]
    UnsupportedIpVersion,

    #[error("IP header too short")]
    Ipv4HeaderTooShort,
    #[error("Full IP header overflows packet")]
    Ipv4FullHeaderOverflow,
    #[error("IP payload overflows packet")]
    Ipv4PayloadOverflow,
    #[error("IP header bigger than datagram")]
    Ipv4HeaderBiggerThanDatagram,
    #[error("More fragments remaining")]
    MoreFragments,
    #[error("Non-zero fragment offset")]
    NonZeroFragmentOffset,
    #[error("Bad IP checksum")]
    BadIpv4Checksum,
    #[error("IPv6 payload overflows packet")]
    Ipv6PayloadOverflow,

    #[error("Truncated TCP header")]
    TruncatedTcp,
    #[error("TCP data offset too small")]
    TcpDataOffsetTooSmall,
    #[error("TCP data offset too big")]
    TcpDataOffsetTooBig,

    #[error("Truncated UDP header")]
    TruncatedUdp,
    #[error("UDP datagram length too small for UDP header")]
    UdpLengthBelowHeader,
    #[error("UDP datagram length too small")]
    UdpLengthTooSmall,
    #[error("UDP datagram length too big")]
    UdpLengthTooBig,

    #[error("Bad IP version for IPPROTO_ICMP")]
    IcmpWithoutIpv4,
    #[error("Truncated ICMPv4 header")]
    TruncatedIcmpv4,
    #[error("Bad IP version for IPPROTO_ICMPV6")]
    Icmpv6WithoutIpv6,
    #[error("Truncated ICMPv6 header")]
    TruncatedIcmpv6,

    #[error("Truncated GRE header")]
    TruncatedGre,
    #[error("GRE header has unsupported version number")]
    GreUnsupportedVersion,
    #[error("GRE header has unsupported routing info")]
    GreRouting,
    #[error("GRE header length too small for GRE header")]
    GreLengthTooSmall,
    #[error("GRE header length too big")]
    GreLengthTooBig,

    #[error("MPLS stack entry overflows packet")]
    MplsEntryOverflow,

    #[error("Too many nested headers at {0} header")]
    TooManyHeaders(HeaderKind),

    #[error("populated length {populated} exceeds buffer of {buffer} bytes")]
    PopulatedLengthExceedsBuffer { populated: usize, buffer: usize },
}

/// A failed top-level decode: the violated rule plus the bytes that broke it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}: packet of {in_bytes} bytes:\n{hex_dump}")]
pub struct ParseFailure {
    pub error: DecodeError,
    pub in_bytes: usize,
    pub hex_dump: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("too many headers")]
    TooManyHeaders(#[from] TooManyHeaders),
    #[error(transparent)]
    OutOfRange(#[from] MplsFieldError),
    #[error("packet buffer full: need {needed} bytes, capacity {capacity}")]
    BufferFull { needed: usize, capacity: usize },
    #[error("{len} bytes is not a valid {kind} header length")]
    BadHeaderLength { kind: HeaderKind, len: usize },
    #[error("header appended after payload")]
    HeaderAfterPayload,
    #[error("no header may follow {0} header")]
    HeaderAfterTerminal(HeaderKind),
    #[error("cannot append after a header was finished")]
    AppendAfterFinish,
    #[error("no unfinished {kind} header at index {index}")]
    ForeignHeader { index: usize, kind: HeaderKind },
    #[error("empty MPLS label stack")]
    EmptyMplsStack,
    #[error("{inner} header is not directly inside {outer} header")]
    NotDirectlyNested { outer: HeaderKind, inner: HeaderKind },
    #[error("{outer} header cannot carry {inner} header")]
    UnsupportedInner { outer: HeaderKind, inner: HeaderKind },
    #[error("{0} header needs an inner header to finish")]
    MissingInner(HeaderKind),
    #[error("{0} header does not encapsulate another header")]
    TerminalWithInner(HeaderKind),
    #[error("{outer} length {len} does not fit its length field")]
    LengthOverflow { outer: HeaderKind, len: usize },
    #[error("{0} headers still unfinished")]
    Unfinished(usize),
}
