use tracing::trace;

use crate::engine::constants::ETHERNET_HEADER_LEN;
use crate::engine::context::{DecodeContext, ParseOutcome};
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::datalink::ethernet::EthernetHeader;
use crate::packet::HeaderKind;

use super::parse_layer3_by_ethertype;

pub(super) fn parse_ethernet(
    cursor: Cursor<'_>,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let ether = cursor
        .peek(ETHERNET_HEADER_LEN)
        .and_then(EthernetHeader::new)
        .ok_or(DecodeError::EthernetHeaderOverflow)?;

    context.register(HeaderKind::Ethernet, ETHERNET_HEADER_LEN, cursor.remaining())?;
    context.l2_header_bytes = ETHERNET_HEADER_LEN;
    trace!("ethernet type {:#06x}", ether.ethertype());

    let mut inner = cursor;
    inner.advance(ETHERNET_HEADER_LEN);
    parse_layer3_by_ethertype(inner, ether.ethertype(), context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::HeaderStack;

    #[test]
    fn short_frame_overflows() {
        let frame = [0u8; 13];
        let mut context = DecodeContext::new(HeaderStack::with_capacity(4), 4);
        assert_eq!(
            parse_ethernet(Cursor::new(&frame), &mut context),
            Err(DecodeError::EthernetHeaderOverflow)
        );
        assert!(context.headers.is_empty());
    }

    #[test]
    fn unknown_ethertype_stops_after_link_header() {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&0x0806u16.to_be_bytes());
        frame.extend_from_slice(&[0u8; 28]);
        let mut context = DecodeContext::new(HeaderStack::with_capacity(4), 4);

        let outcome = parse_ethernet(Cursor::new(&frame), &mut context);
        assert_eq!(outcome, Ok(ParseOutcome::UnknownUpperLayer));
        assert_eq!(context.l2_header_bytes, 14);
        let eth = context.headers.innermost().expect("ethernet registered");
        assert_eq!(eth.kind, HeaderKind::Ethernet);
        assert_eq!(eth.total_bytes, frame.len());
    }
}
