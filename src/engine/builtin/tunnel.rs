use tracing::debug;

use crate::engine::constants::{GRE_HEADER_LEN, MPLS_ENTRY_LEN};
use crate::engine::context::{DecodeContext, ParseOutcome};
use crate::engine::cursor::Cursor;
use crate::engine::error::DecodeError;
use crate::layer::tunnel::gre::GreHeader;
use crate::layer::tunnel::mpls::MplsEntry;
use crate::packet::HeaderKind;

use super::{parse_layer3_by_ethertype, parse_layer3_by_version};

/// Optional checksum, key and sequence words are skipped, never verified.
pub(super) fn parse_gre(
    cursor: Cursor<'_>,
    layer4_bytes: usize,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    if layer4_bytes < GRE_HEADER_LEN {
        return Err(DecodeError::TruncatedGre);
    }
    let gre = cursor
        .peek(GRE_HEADER_LEN)
        .and_then(GreHeader::new)
        .ok_or(DecodeError::TruncatedGre)?;

    if gre.version() != 0 {
        return Err(DecodeError::GreUnsupportedVersion);
    }
    if gre.has_routing() {
        return Err(DecodeError::GreRouting);
    }
    let header_len = gre.header_len();
    if header_len < GRE_HEADER_LEN {
        return Err(DecodeError::GreLengthTooSmall);
    }
    if header_len > layer4_bytes {
        return Err(DecodeError::GreLengthTooBig);
    }

    debug!("GRE header len: {}", header_len);
    context.register(HeaderKind::Gre, header_len, layer4_bytes)?;

    let mut inner = cursor;
    inner.advance(header_len);
    parse_layer3_by_ethertype(inner, gre.protocol_type(), context)
}

/// Walks label stack entries until the bottom-of-stack bit or the end of
/// the buffer, then decodes the payload by its IP version nibble.
pub(super) fn parse_mpls(
    cursor: Cursor<'_>,
    context: &mut DecodeContext,
) -> Result<ParseOutcome, DecodeError> {
    let total_bytes = cursor.remaining();
    let mut walk = cursor;
    let mut header_bytes = 0;

    loop {
        let entry = walk
            .read_exact(MPLS_ENTRY_LEN)
            .and_then(MplsEntry::from_bytes)
            .ok_or(DecodeError::MplsEntryOverflow)?;
        header_bytes += MPLS_ENTRY_LEN;
        if entry.is_stack_bottom() || walk.remaining() == 0 {
            break;
        }
    }

    debug!("MPLS label stack of {} bytes", header_bytes);
    context.register(HeaderKind::Mpls, header_bytes, total_bytes)?;
    parse_layer3_by_version(walk, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::HeaderStack;

    fn context() -> DecodeContext {
        DecodeContext::new(HeaderStack::with_capacity(6), 6)
    }

    fn gre_header(flags: u16, protocol: u16, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        bytes[0..2].copy_from_slice(&flags.to_be_bytes());
        bytes[2..4].copy_from_slice(&protocol.to_be_bytes());
        bytes
    }

    #[test]
    fn gre_with_unknown_payload_registers_itself() {
        let bytes = gre_header(0x0000, 0x88b5, 12);
        let mut context = context();
        assert_eq!(
            parse_gre(Cursor::new(&bytes), 12, &mut context),
            Ok(ParseOutcome::UnknownUpperLayer)
        );
        let gre = context.headers.innermost().expect("gre registered");
        assert_eq!((gre.kind, gre.header_bytes, gre.total_bytes), (HeaderKind::Gre, 4, 12));
    }

    #[test]
    fn gre_optional_words_extend_header() {
        let bytes = gre_header(0xb000, 0x88b5, 16);
        let mut context = context();
        parse_gre(Cursor::new(&bytes), 16, &mut context).expect("key and sequence accepted");
        assert_eq!(context.headers.innermost().map(|r| r.header_bytes), Some(16));
    }

    #[test]
    fn gre_rejections_in_order() {
        assert_eq!(
            parse_gre(Cursor::new(&[0u8; 3]), 3, &mut context()),
            Err(DecodeError::TruncatedGre)
        );

        let version_one = gre_header(0x0001, 0x0800, 8);
        assert_eq!(
            parse_gre(Cursor::new(&version_one), 8, &mut context()),
            Err(DecodeError::GreUnsupportedVersion)
        );

        let routing = gre_header(0x4000, 0x0800, 8);
        assert_eq!(
            parse_gre(Cursor::new(&routing), 8, &mut context()),
            Err(DecodeError::GreRouting)
        );

        let keyed = gre_header(0x2000, 0x0800, 6);
        assert_eq!(
            parse_gre(Cursor::new(&keyed), 6, &mut context()),
            Err(DecodeError::GreLengthTooBig)
        );
    }

    #[test]
    fn mpls_walk_stops_at_bottom_of_stack() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MplsEntry::encode(100, 0, false, 64).expect("in range").to_bytes());
        bytes.extend_from_slice(&MplsEntry::encode(200, 0, true, 64).expect("in range").to_bytes());
        bytes.extend_from_slice(&[0x70u8; 20]);
        let mut context = context();

        assert_eq!(
            parse_mpls(Cursor::new(&bytes), &mut context),
            Err(DecodeError::UnsupportedIpVersion)
        );
        let mpls = context.headers.innermost().expect("mpls registered");
        assert_eq!((mpls.header_bytes, mpls.total_bytes), (8, bytes.len()));
    }

    #[test]
    fn mpls_entry_past_buffer_overflows() {
        let bytes = [0x00, 0x06, 0x40];
        assert_eq!(
            parse_mpls(Cursor::new(&bytes), &mut context()),
            Err(DecodeError::MplsEntryOverflow)
        );
    }

    #[test]
    fn mpls_stack_without_bottom_ends_at_buffer_end() {
        let bytes = MplsEntry::encode(7, 0, false, 1).expect("in range").to_bytes();
        let mut context = context();
        assert_eq!(
            parse_mpls(Cursor::new(&bytes), &mut context),
            Err(DecodeError::IpHeaderOverflow)
        );
        assert_eq!(context.headers.innermost().map(|r| r.header_bytes), Some(4));
    }
}
