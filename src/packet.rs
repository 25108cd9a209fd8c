pub mod owned;
pub mod stack;

pub use owned::{Packet, PrimaryHeaders, hex_dump};
pub use stack::{HeaderKind, HeaderRecord, HeaderStack, TooManyHeaders};
