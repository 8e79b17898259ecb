//! Compiled-in Cloudflare ranges
//!
//! Returned when no live list can be obtained. Source:
//! https://www.cloudflare.com/ips/

use crate::types::{AggregateList, Family, NetworkList};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

const IPS_V4: &[(Ipv4Addr, u8)] = &[
    (Ipv4Addr::new(173, 245, 48, 0), 20),
    (Ipv4Addr::new(103, 21, 244, 0), 22),
    (Ipv4Addr::new(103, 22, 200, 0), 22),
    (Ipv4Addr::new(103, 31, 4, 0), 22),
    (Ipv4Addr::new(141, 101, 64, 0), 18),
    (Ipv4Addr::new(108, 162, 192, 0), 18),
    (Ipv4Addr::new(190, 93, 240, 0), 20),
    (Ipv4Addr::new(188, 114, 96, 0), 20),
    (Ipv4Addr::new(197, 234, 240, 0), 22),
    (Ipv4Addr::new(198, 41, 128, 0), 17),
    (Ipv4Addr::new(162, 158, 0, 0), 15),
    (Ipv4Addr::new(104, 16, 0, 0), 13),
    (Ipv4Addr::new(104, 24, 0, 0), 14),
    (Ipv4Addr::new(172, 64, 0, 0), 13),
    (Ipv4Addr::new(131, 0, 72, 0), 22),
];

const IPS_V6: &[(Ipv6Addr, u8)] = &[
    (Ipv6Addr::new(0x2400, 0xcb00, 0, 0, 0, 0, 0, 0), 32),
    (Ipv6Addr::new(0x2606, 0x4700, 0, 0, 0, 0, 0, 0), 32),
    (Ipv6Addr::new(0x2803, 0xf800, 0, 0, 0, 0, 0, 0), 32),
    (Ipv6Addr::new(0x2405, 0xb500, 0, 0, 0, 0, 0, 0), 32),
    (Ipv6Addr::new(0x2405, 0x8100, 0, 0, 0, 0, 0, 0), 32),
    (Ipv6Addr::new(0x2a06, 0x98c0, 0, 0, 0, 0, 0, 0), 29),
    (Ipv6Addr::new(0x2c0f, 0xf248, 0, 0, 0, 0, 0, 0), 32),
];

static FALLBACK_V4: LazyLock<NetworkList> = LazyLock::new(|| {
    let nets = IPS_V4
        .iter()
        .filter_map(|&(addr, len)| Ipv4Net::new(addr, len).ok())
        .map(IpNet::V4)
        .collect();
    NetworkList::new(Family::V4, nets)
});

static FALLBACK_V6: LazyLock<NetworkList> = LazyLock::new(|| {
    let nets = IPS_V6
        .iter()
        .filter_map(|&(addr, len)| Ipv6Net::new(addr, len).ok())
        .map(IpNet::V6)
        .collect();
    NetworkList::new(Family::V6, nets)
});

/// Last-known ranges at build time
pub struct FallbackIps;

impl FallbackIps {
    /// Compiled-in IPv4 ranges
    pub fn v4() -> NetworkList {
        FALLBACK_V4.clone()
    }

    /// Compiled-in IPv6 ranges
    pub fn v6() -> NetworkList {
        FALLBACK_V6.clone()
    }

    /// IPv4 ranges followed by IPv6 ranges
    pub fn all() -> AggregateList {
        AggregateList::concat(&FALLBACK_V4, &FALLBACK_V6)
    }
}
