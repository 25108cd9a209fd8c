use std::mem;

use tracing::debug;

use super::builtin;
use super::context::{DecodeConfig, DecodeContext, ParseOutcome, StartLayer};
use super::error::{DecodeError, ParseFailure};
use crate::packet::{HeaderStack, Packet, hex_dump};

#[derive(Debug, Default)]
pub struct Decoder {
    pub config: DecodeConfig,
}

impl Decoder {
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Decodes the first `in_bytes` bytes of `packet`, replacing whatever a
    /// previous decode left in its header stack.
    ///
    /// Headers registered before a failure stay on the stack, so callers can
    /// see how far the decode got.
    pub fn parse(
        &self,
        packet: &mut Packet,
        in_bytes: usize,
        layer: StartLayer,
    ) -> Result<ParseOutcome, ParseFailure> {
        packet.reset_decode_state();

        let populated = packet.len();
        if in_bytes > populated {
            return Err(ParseFailure {
                error: DecodeError::PopulatedLengthExceedsBuffer {
                    populated: in_bytes,
                    buffer: populated,
                },
                in_bytes,
                hex_dump: packet.hex_dump(),
            });
        }

        let headers = mem::replace(&mut packet.headers, HeaderStack::with_capacity(0));
        let mut context = DecodeContext::new(headers, self.config.max_depth);
        let bytes = &packet.as_bytes()[..in_bytes];
        let result = builtin::decode(bytes, layer, &mut context).map_err(|error| ParseFailure {
            error,
            in_bytes,
            hex_dump: hex_dump(bytes),
        });
        context.store(packet);

        if let Err(failure) = &result {
            debug!("packet rejected: {}", failure.error);
        }
        result
    }
}

/// Decodes with the default configuration.
pub fn parse_packet(
    packet: &mut Packet,
    in_bytes: usize,
    layer: StartLayer,
) -> Result<ParseOutcome, ParseFailure> {
    Decoder::default().parse(packet, in_bytes, layer)
}
