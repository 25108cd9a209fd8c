//! The datalink layer (Layer 2) modules.

pub mod ethernet;
