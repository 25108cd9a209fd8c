pub mod icmp;
pub mod icmpv6;
pub mod ipv4;
pub mod ipv6;

/// Version nibble shared by the first byte of IPv4 and IPv6 headers.
pub fn ip_version(first_byte: u8) -> u8 {
    first_byte >> 4
}
