//! Recursive-descent decoding: link → network → transport, re-entering the
//! network layer for every tunnel (GRE, MPLS, IP-in-IP) on the way.

mod link;
mod network;
mod transport;
mod tunnel;


use tracing::trace;

use super::constants::{
    IPV4_HEADER_LEN, IPV6_HEADER_LEN, ethertype, ethertype_name, ip_proto, ip_protocol_name,
};
use super::context::{DecodeContext, ParseOutcome, StartLayer};
use super::cursor::Cursor;
use super::error::DecodeError;
use crate::layer::network::ip_version;

use self::link::parse_ethernet;
use self::network::{parse_ipv4, parse_ipv6};
use self::transport::{parse_icmpv4, parse_icmpv6, parse_tcp, parse_udp};
use self::tunnel::{parse_gre, parse_mpls};

/// What the layer-4 dispatcher found inside an IP header.
#[derive(Debug, Clone, Copy)]
pub(super) struct Dispatch {
    pub outcome: ParseOutcome,
    /// The payload was a transport header, so the enclosing IP header is the
    /// innermost one.
    pub is_inner: bool,
}

pub(crate) fn decode(
    data: &[u8],
    layer: StartLayer,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let cursor = Cursor::new(data);
    match layer {
        StartLayer::Ethernet => parse_ethernet(cursor, context),
        StartLayer::Ip => parse_layer3_by_version(cursor, context),
    }
}

pub(super) fn parse_layer3_by_ethertype(
    cursor: Cursor<'_>,
    ethertype: u16,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    match ethertype {
        ethertype::IPV4 => {
            let header = cursor
                .peek(IPV4_HEADER_LEN)
                .ok_or(DecodeError::Ipv4HeaderOverflow)?;
            if ip_version(header[0]) != 4 {
                return Err(DecodeError::BadIpv4Version);
            }
            parse_ipv4(cursor, context)
        }
        ethertype::IPV6 => {
            let header = cursor
                .peek(IPV6_HEADER_LEN)
                .ok_or(DecodeError::Ipv6HeaderOverflow)?;
            if ip_version(header[0]) != 6 {
                return Err(DecodeError::BadIpv6Version);
            }
            parse_ipv6(cursor, context)
        }
        ethertype::MPLS_UNICAST | ethertype::MPLS_MULTICAST => parse_mpls(cursor, context),
        other => {
            trace!(
                "no parser for ethertype {:#06x} ({})",
                other,
                ethertype_name(other)
            );
            Ok(ParseOutcome::UnknownUpperLayer)
        }
    }
}

/// For buffers already at layer 3 with no EtherType to go by.
pub(super) fn parse_layer3_by_version(
    cursor: Cursor<'_>,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let header = cursor
        .peek(IPV4_HEADER_LEN)
        .ok_or(DecodeError::IpHeaderOverflow)?;
    match ip_version(header[0]) {
        4 => parse_ipv4(cursor, context),
        6 => parse_ipv6(cursor, context),
        _ => Err(DecodeError::UnsupportedIpVersion),
    }
}

/// `cursor` starts at the layer-4 header and still ends at the end of the
/// buffer; `layer4_bytes` is what the enclosing IP header declared.
pub(super) fn parse_layer4(
    cursor: Cursor<'_>,
    protocol: u8,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<Dispatch, DecodeError> {
    let (outcome, is_inner) = match protocol {
        ip_proto::TCP => (parse_tcp(cursor, layer4_bytes, context)?, true),
        ip_proto::UDP => (parse_udp(cursor, layer4_bytes, context)?, true),
        ip_proto::ICMP => (parse_icmpv4(cursor, layer4_bytes, context)?, true),
        ip_proto::ICMPV6 => (parse_icmpv6(cursor, layer4_bytes, context)?, true),
        ip_proto::GRE => (parse_gre(cursor, layer4_bytes, context)?, false),
        ip_proto::IPIP => (parse_ipv4(cursor, context)?, false),
        ip_proto::IPV6 => (parse_ipv6(cursor, context)?, false),
        other => {
            trace!(
                "no parser for IP protocol {} ({})",
                other,
                ip_protocol_name(other)
            );
            (ParseOutcome::UnknownUpperLayer, false)
        }
    };
    Ok(Dispatch { outcome, is_inner })
}
