//! # Scope Item Model
//!
//! Defines the kinds of entry a scope can hold and the single classification
//! routine every other component goes through.
//!
//! A normalized token is exactly one of:
//! * An IPv4 address (e.g., `10.0.0.1`).
//! * An IPv4 CIDR block (e.g., `10.0.0.0/24`).
//! * An IPv6 address (e.g., `2001:db8::1`).
//! * An IPv6 CIDR block (e.g., `2001:db8::/64`).
//! * A domain name (anything else that survived normalization).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

use crate::error::ScopeError;
use crate::network::{normalize, range};

/// The category a scope item is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Ipv4,
    Ipv6,
    Domains,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Ipv4 => write!(f, "IPv4"),
            Bucket::Ipv6 => write!(f, "IPv6"),
            Bucket::Domains => write!(f, "domains"),
        }
    }
}

/// A classified scope token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeItem {
    Ipv4Address(Ipv4Addr),
    Ipv4Cidr(Ipv4Network),
    Ipv6Address(Ipv6Addr),
    Ipv6Cidr(Ipv6Network),
    Domain(String),
    /// Contains `/` but is not a CIDR, or contains `:` but is not an IPv6 address.
    Invalid,
}

impl ScopeItem {
    /// Where the item lives once added; `None` for [`ScopeItem::Invalid`].
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            ScopeItem::Ipv4Address(_) | ScopeItem::Ipv4Cidr(_) => Some(Bucket::Ipv4),
            ScopeItem::Ipv6Address(_) | ScopeItem::Ipv6Cidr(_) => Some(Bucket::Ipv6),
            ScopeItem::Domain(_) => Some(Bucket::Domains),
            ScopeItem::Invalid => None,
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        match self {
            ScopeItem::Ipv4Address(addr) => Some(IpAddr::V4(*addr)),
            ScopeItem::Ipv6Address(addr) => Some(IpAddr::V6(*addr)),
            _ => None,
        }
    }

    pub fn network(&self) -> Option<IpNetwork> {
        match self {
            ScopeItem::Ipv4Cidr(net) => Some(IpNetwork::V4(*net)),
            ScopeItem::Ipv6Cidr(net) => Some(IpNetwork::V6(*net)),
            _ => None,
        }
    }
}

impl FromStr for ScopeItem {
    type Err = ScopeError;

    /// Normalizes then classifies a raw item.
    ///
    /// Supported formats are whatever [`normalize::normalize`] accepts:
    /// * **Hosts**: "10.0.0.1", "2001:db8::1", "example.com".
    /// * **CIDRs**: "10.0.0.1/24", "2001:db8::/64".
    /// * **URLs and ports**: "https://example.com:8443/login", "example.com:443".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize::normalize(s)?;
        match classify(&token) {
            ScopeItem::Invalid => Err(ScopeError::InvalidToken(s.to_string())),
            item => Ok(item),
        }
    }
}

/// Classifies an already normalized token.
///
/// The order of checks is fixed: `/` means CIDR, then `:` means IPv6 address,
/// then a dotted quad means IPv4 address, and anything else is a domain.
pub fn classify(token: &str) -> ScopeItem {
    if token.is_empty() {
        return ScopeItem::Invalid;
    }

    if token.contains('/') {
        return parse_cidr(token).unwrap_or(ScopeItem::Invalid);
    }

    if token.contains(':') {
        return parse_ipv6_host(token).unwrap_or(ScopeItem::Invalid);
    }

    if let Some(item) = parse_ipv4_host(token) {
        return item;
    }

    ScopeItem::Domain(token.to_string())
}

/// Parses CIDR notation like "192.168.1.0/24" or "2001:db8::/64".
fn parse_cidr(token: &str) -> Option<ScopeItem> {
    match range::parse_cidr(token).ok()? {
        IpNetwork::V4(net) => Some(ScopeItem::Ipv4Cidr(net)),
        IpNetwork::V6(net) => Some(ScopeItem::Ipv6Cidr(net)),
    }
}

fn parse_ipv6_host(token: &str) -> Option<ScopeItem> {
    token.parse::<Ipv6Addr>().ok().map(ScopeItem::Ipv6Address)
}

fn parse_ipv4_host(token: &str) -> Option<ScopeItem> {
    token.parse::<Ipv4Addr>().ok().map(ScopeItem::Ipv4Address)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
