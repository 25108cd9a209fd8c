use tracing::debug;

use crate::engine::constants::{IPV4_HEADER_LEN, IPV6_HEADER_LEN};
use crate::engine::context::{DecodeContext, ParseOutcome};
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::checksum::ipv4_checksum;
use crate::layer::network::ipv4::Ipv4Header;
use crate::layer::network::ipv6::Ipv6Header;
use crate::packet::HeaderKind;

use super::parse_layer4;

/// The version nibble is not re-checked here: callers either checked it
/// against the EtherType or arrived through IP protocol 4.
pub(super) fn parse_ipv4(
    cursor: Cursor<'_>,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let fixed = cursor
        .peek(IPV4_HEADER_LEN)
        .and_then(Ipv4Header::new)
        .ok_or(DecodeError::Ipv4HeaderOverflow)?;

    let header_len = fixed.header_len();
    if header_len < IPV4_HEADER_LEN {
        return Err(DecodeError::Ipv4HeaderTooShort);
    }
    let header_bytes = cursor
        .peek(header_len)
        .ok_or(DecodeError::Ipv4FullHeaderOverflow)?;

    let total_len = usize::from(fixed.total_length());
    if total_len > cursor.remaining() {
        return Err(DecodeError::Ipv4PayloadOverflow);
    }
    if header_len > total_len {
        return Err(DecodeError::Ipv4HeaderBiggerThanDatagram);
    }
    if fixed.more_fragments() {
        return Err(DecodeError::MoreFragments);
    }
    if fixed.fragment_offset() != 0 {
        return Err(DecodeError::NonZeroFragmentOffset);
    }
    if ipv4_checksum(header_bytes) != 0 {
        return Err(DecodeError::BadIpv4Checksum);
    }

    let index = context.register(HeaderKind::Ipv4, header_len, total_len)?;
    if context.ip_bytes.is_none() {
        context.ip_bytes = Some(total_len);
    }
    debug!("src IP: {}", fixed.source());
    debug!("dst IP: {}", fixed.destination());

    let mut inner = cursor;
    inner.advance(header_len);
    let dispatch = parse_layer4(inner, fixed.protocol(), total_len - header_len, context)?;
    if dispatch.is_inner {
        context.primary.ipv4 = Some(index);
    }
    Ok(dispatch.outcome)
}

/// Extension headers are not walked; `next_header` is the upper layer.
pub(super) fn parse_ipv6(
    cursor: Cursor<'_>,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let ipv6 = cursor
        .peek(IPV6_HEADER_LEN)
        .and_then(Ipv6Header::new)
        .ok_or(DecodeError::Ipv6HeaderOverflow)?;

    let payload_len = usize::from(ipv6.payload_length());
    let total_len = IPV6_HEADER_LEN + payload_len;
    if total_len > cursor.remaining() {
        return Err(DecodeError::Ipv6PayloadOverflow);
    }

    let index = context.register(HeaderKind::Ipv6, IPV6_HEADER_LEN, total_len)?;
    if context.ip_bytes.is_none() {
        context.ip_bytes = Some(total_len);
    }
    debug!("src IP: {}", ipv6.source());
    debug!("dst IP: {}", ipv6.destination());

    let mut inner = cursor;
    inner.advance(IPV6_HEADER_LEN);
    let dispatch = parse_layer4(inner, ipv6.next_header(), payload_len, context)?;
    if dispatch.is_inner {
        context.primary.ipv6 = Some(index);
    }
    Ok(dispatch.outcome)
}
