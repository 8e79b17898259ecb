//! Data model: resource kinds, address families and network lists
//!
//! Lists are immutable once built. They are backed by `Arc<[IpNet]>` so the
//! cache, the memoized aggregate and callers can share one allocation.

use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;
use std::ops::Deref;
use std::sync::Arc;

/// Namespace prefix of every cache key
pub const CACHE_NAMESPACE: &str = "cloudflare-rails";

/// Origin hosting the published IP lists
pub const CLOUDFLARE_ORIGIN: &str = "https://www.cloudflare.com";

/// Address family of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Family of a parsed network
    pub fn of(net: &IpNet) -> Self {
        match net {
            IpNet::V4(_) => Family::V4,
            IpNet::V6(_) => Family::V6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
        }
    }
}

/// One of the two published resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    V4,
    V6,
}

impl ResourceKind {
    /// Path of the resource relative to the origin
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::V4 => "/ips-v4/",
            ResourceKind::V6 => "/ips-v6/",
        }
    }

    /// Address family the resource lists
    pub fn family(self) -> Family {
        match self {
            ResourceKind::V4 => Family::V4,
            ResourceKind::V6 => Family::V6,
        }
    }

    /// Kind suffix used in cache keys
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::V4 => "ips_v4",
            ResourceKind::V6 => "ips_v6",
        }
    }

    /// Cache key of the form `cloudflare-rails:<kind>`
    pub fn cache_key(self) -> String {
        format!("{}:{}", CACHE_NAMESPACE, self.as_str())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, family-homogeneous list of networks
///
/// Only the parser and the fallback provider construct these, which is what
/// keeps every member valid and of the list's family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkList {
    family: Family,
    nets: Arc<[IpNet]>,
}

impl NetworkList {
    pub(crate) fn new(family: Family, nets: Vec<IpNet>) -> Self {
        debug_assert!(nets.iter().all(|net| Family::of(net) == family));
        Self {
            family,
            nets: nets.into(),
        }
    }

    /// Family shared by every member
    pub fn family(&self) -> Family {
        self.family
    }

    /// Members as a slice, in source order
    pub fn as_slice(&self) -> &[IpNet] {
        &self.nets
    }
}

impl Deref for NetworkList {
    type Target = [IpNet];

    fn deref(&self) -> &[IpNet] {
        &self.nets
    }
}

impl<'a> IntoIterator for &'a NetworkList {
    type Item = &'a IpNet;
    type IntoIter = std::slice::Iter<'a, IpNet>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.iter()
    }
}

/// The IPv4 list followed by the IPv6 list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateList {
    nets: Arc<[IpNet]>,
    v4_len: usize,
}

impl AggregateList {
    /// Concatenate the two halves, v4 first
    pub fn concat(v4: &NetworkList, v6: &NetworkList) -> Self {
        let nets: Vec<IpNet> = v4.iter().chain(v6.iter()).copied().collect();
        Self {
            nets: nets.into(),
            v4_len: v4.len(),
        }
    }

    /// The IPv4 half
    pub fn v4(&self) -> &[IpNet] {
        &self.nets[..self.v4_len]
    }

    /// The IPv6 half
    pub fn v6(&self) -> &[IpNet] {
        &self.nets[self.v4_len..]
    }

    /// Whether any listed network contains `addr`
    pub fn contains(&self, addr: IpAddr) -> bool {
        let half = match addr {
            IpAddr::V4(_) => self.v4(),
            IpAddr::V6(_) => self.v6(),
        };
        half.iter().any(|net| net.contains(&addr))
    }

    /// Whether `other` is the very same allocation
    pub fn ptr_eq(&self, other: &AggregateList) -> bool {
        Arc::ptr_eq(&self.nets, &other.nets)
    }
}

impl Deref for AggregateList {
    type Target = [IpNet];

    fn deref(&self) -> &[IpNet] {
        &self.nets
    }
}

impl<'a> IntoIterator for &'a AggregateList {
    type Item = &'a IpNet;
    type IntoIter = std::slice::Iter<'a, IpNet>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.iter()
    }
}
