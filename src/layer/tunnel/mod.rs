//! Encapsulation headers that carry another network-layer packet.

pub mod gre;
pub mod mpls;
