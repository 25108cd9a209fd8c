//! The transport layer (Layer 4) modules.
//! This layer handles protocols like TCP and UDP.

pub mod tcp;
pub mod udp;
