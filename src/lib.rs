pub mod engine;
pub mod layer;
pub mod packet;

pub use engine::{
    ComposeError, DecodeConfig, DecodeError, Decoder, HeaderHandle, PacketBuilder, ParseFailure,
    ParseOutcome, PendingHeader, StartLayer, parse_packet,
};
pub use layer::tunnel::mpls::{MplsEntry, MplsFieldError, MplsStack};
pub use packet::{HeaderKind, HeaderRecord, HeaderStack, Packet};
