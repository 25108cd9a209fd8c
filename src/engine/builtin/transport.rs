use tracing::debug;

use crate::engine::constants::{
    ICMPV4_HEADER_LEN, ICMPV6_HEADER_LEN, TCP_HEADER_LEN, UDP_HEADER_LEN,
};
use crate::engine::context::{DecodeContext, ParseOutcome};
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::transport::tcp::TcpHeader;
use crate::layer::transport::udp::UdpHeader;
use crate::packet::HeaderKind;

/// TCP payload is opaque: the record spans the whole layer-4 range.
pub(super) fn parse_tcp(
    cursor: Cursor<'_>,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    if layer4_bytes < TCP_HEADER_LEN {
        return Err(DecodeError::TruncatedTcp);
    }
    let tcp = cursor
        .peek(TCP_HEADER_LEN)
        .and_then(TcpHeader::new)
        .ok_or(DecodeError::TruncatedTcp)?;

    let header_len = tcp.header_len();
    if header_len < TCP_HEADER_LEN {
        return Err(DecodeError::TcpDataOffsetTooSmall);
    }
    if header_len > layer4_bytes {
        return Err(DecodeError::TcpDataOffsetTooBig);
    }

    let index = context.register(HeaderKind::Tcp, header_len, layer4_bytes)?;
    context.primary.transport = Some(index);
    debug!("TCP src port: {}", tcp.source_port());
    debug!("TCP dst port: {}", tcp.destination_port());
    Ok(ParseOutcome::Ok)
}

/// Unlike TCP the UDP length field must match the layer-4 range exactly.
pub(super) fn parse_udp(
    cursor: Cursor<'_>,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    if layer4_bytes < UDP_HEADER_LEN {
        return Err(DecodeError::TruncatedUdp);
    }
    let udp = cursor
        .peek(UDP_HEADER_LEN)
        .and_then(UdpHeader::new)
        .ok_or(DecodeError::TruncatedUdp)?;

    let udp_len = usize::from(udp.length());
    if udp_len < UDP_HEADER_LEN {
        return Err(DecodeError::UdpLengthBelowHeader);
    }
    if udp_len < layer4_bytes {
        return Err(DecodeError::UdpLengthTooSmall);
    }
    if udp_len > layer4_bytes {
        return Err(DecodeError::UdpLengthTooBig);
    }

    let index = context.register(HeaderKind::Udp, UDP_HEADER_LEN, layer4_bytes)?;
    context.primary.transport = Some(index);
    debug!("UDP src port: {}", udp.source_port());
    debug!("UDP dst port: {}", udp.destination_port());
    Ok(ParseOutcome::Ok)
}

pub(super) fn parse_icmpv4(
    cursor: Cursor<'_>,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    if context.innermost_kind() != Some(HeaderKind::Ipv4) {
        return Err(DecodeError::IcmpWithoutIpv4);
    }
    if layer4_bytes < ICMPV4_HEADER_LEN || cursor.peek(ICMPV4_HEADER_LEN).is_none() {
        return Err(DecodeError::TruncatedIcmpv4);
    }

    let index = context.register(HeaderKind::Icmpv4, ICMPV4_HEADER_LEN, layer4_bytes)?;
    context.primary.transport = Some(index);
    Ok(ParseOutcome::Ok)
}

pub(super) fn parse_icmpv6(
    cursor: Cursor<'_>,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    if context.innermost_kind() != Some(HeaderKind::Ipv6) {
        return Err(DecodeError::Icmpv6WithoutIpv6);
    }
    if layer4_bytes < ICMPV6_HEADER_LEN || cursor.peek(ICMPV6_HEADER_LEN).is_none() {
        return Err(DecodeError::TruncatedIcmpv6);
    }

    let index = context.register(HeaderKind::Icmpv6, ICMPV6_HEADER_LEN, layer4_bytes)?;
    context.primary.transport = Some(index);
    Ok(ParseOutcome::Ok)
}
