mod builtin;
pub mod compose;
pub mod constants;
pub mod context;
pub mod cursor;
pub mod decoder;
pub mod error;

pub use compose::{HeaderHandle, PacketBuilder, PendingHeader};
pub use context::{DecodeConfig, DecodeContext, ParseOutcome, StartLayer};
pub use decoder::{Decoder, parse_packet};
pub use error::{ComposeError, DecodeError, ParseFailure};
