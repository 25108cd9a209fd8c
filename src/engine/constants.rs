pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const IPV6: u16 = 0x86DD;
    pub const MPLS_UNICAST: u16 = 0x8847;
    pub const MPLS_MULTICAST: u16 = 0x8848;
}

pub mod ip_proto {
    pub const ICMP: u8 = 1;
    pub const IPIP: u8 = 4;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const IPV6: u8 = 41;
    pub const GRE: u8 = 47;
    pub const ICMPV6: u8 = 58;
}

/// Header stack depth of one packet unless the caller picks another.
pub const DEFAULT_MAX_HEADERS: usize = 6;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const IPV4_HEADER_LEN: usize = 20;
pub const IPV6_HEADER_LEN: usize = 40;
pub const TCP_HEADER_LEN: usize = 20;
pub const UDP_HEADER_LEN: usize = 8;
pub const ICMPV4_HEADER_LEN: usize = 8;
pub const ICMPV6_HEADER_LEN: usize = 8;
pub const GRE_HEADER_LEN: usize = 4;
pub const MPLS_ENTRY_LEN: usize = 4;

pub fn ethertype_name(value: u16) -> &'static str {
    match value {
        ethertype::IPV4 => "ipv4",
        ethertype::IPV6 => "ipv6",
        ethertype::MPLS_UNICAST => "mpls-unicast",
        ethertype::MPLS_MULTICAST => "mpls-multicast",
        _ => "unknown",
    }
}

pub fn ip_protocol_name(value: u8) -> &'static str {
    match value {
        ip_proto::ICMP => "icmp",
        ip_proto::IPIP => "ipip",
        ip_proto::TCP => "tcp",
        ip_proto::UDP => "udp",
        ip_proto::IPV6 => "ipv6",
        ip_proto::GRE => "gre",
        ip_proto::ICMPV6 => "icmpv6",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::{ethertype, ethertype_name, ip_proto, ip_protocol_name};

    #[test]
    fn ethertype_names_cover_known_values() {
        assert_eq!(ethertype_name(ethertype::IPV4), "ipv4");
        assert_eq!(ethertype_name(ethertype::MPLS_UNICAST), "mpls-unicast");
        assert_eq!(ethertype_name(0x1234), "unknown");
    }

    #[test]
    fn ip_protocol_names_cover_known_values() {
        assert_eq!(ip_protocol_name(ip_proto::TCP), "tcp");
        assert_eq!(ip_protocol_name(ip_proto::GRE), "gre");
        assert_eq!(ip_protocol_name(250), "unknown");
    }
}
