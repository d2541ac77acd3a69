//! # CIDR Expansion
//!
//! Turns a CIDR block (or a single address) into the ordered addresses it covers.
//!
//! Expansion is lazy: an [`Expansion`] walks a numeric range, so nothing is
//! materialized unless the caller collects it. IPv4 and IPv6 blocks are
//! handled the same way, but a short IPv6 prefix can describe more addresses
//! than any caller could enumerate. Anything that walks a whole block should
//! compare [`Expansion::len`] against a limit first.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::RangeInclusive;

use pnet::ipnetwork::IpNetwork;

use crate::error::{Result, ScopeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    fn addr(self, value: u128) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(Ipv4Addr::from(value as u32)),
            Family::V6 => IpAddr::V6(Ipv6Addr::from(value)),
        }
    }
}

/// An address as its family and integer value.
pub fn to_u128(addr: IpAddr) -> (Family, u128) {
    match addr {
        IpAddr::V4(v4) => (Family::V4, u32::from(v4) as u128),
        IpAddr::V6(v6) => (Family::V6, u128::from(v6)),
    }
}

/// Ordered, restartable walk over the addresses of one block, inclusive.
///
/// Cloning an `Expansion` restarts the walk from the clone's position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    family: Family,
    range: RangeInclusive<u128>,
}

impl Expansion {
    /// An expansion holding exactly one address.
    pub fn single(addr: IpAddr) -> Self {
        let (family, value) = to_u128(addr);
        Self {
            family,
            range: value..=value,
        }
    }

    /// Covers every address of `network`.
    ///
    /// Without `include_network_and_broadcast`, a block of more than one
    /// address loses its first and last entries.
    pub fn from_network(network: IpNetwork, include_network_and_broadcast: bool) -> Self {
        let (family, start, end) = network_bounds(&network);

        let range = if start == end || include_network_and_broadcast {
            start..=end
        } else {
            (start + 1)..=(end - 1)
        };

        Self { family, range }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Number of addresses left in the walk, saturating at `u128::MAX`.
    pub fn len(&self) -> u128 {
        if self.range.is_empty() {
            return 0;
        }
        (self.range.end() - self.range.start()).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Fails with [`ScopeError::ExpansionTooLarge`] when the walk is longer than `limit`.
    pub fn within(self, cidr: &str, limit: u128) -> Result<Self> {
        let size = self.len();
        if size > limit {
            return Err(ScopeError::ExpansionTooLarge {
                cidr: cidr.to_string(),
                size,
                limit,
            });
        }
        Ok(self)
    }
}

impl Iterator for Expansion {
    type Item = IpAddr;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|value| self.family.addr(value))
    }
}

impl DoubleEndedIterator for Expansion {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(|value| self.family.addr(value))
    }
}

/// First and last address of `network` as integers, network and broadcast included.
pub fn network_bounds(network: &IpNetwork) -> (Family, u128, u128) {
    let (family, ip) = to_u128(network.ip());
    let host_bits = family.bits() - network.prefix();
    let host_mask: u128 = if host_bits == 0 {
        0
    } else if host_bits == 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };

    let start = ip & !host_mask;
    (family, start, start | host_mask)
}

/// Parses `address/prefix` into its masked network form
/// (`10.0.0.1/24` becomes `10.0.0.0/24`).
pub fn parse_cidr(cidr: &str) -> Result<IpNetwork> {
    let Some((ip_str, prefix_str)) = cidr.split_once('/') else {
        return Err(ScopeError::invalid_cidr(cidr, "missing prefix length"));
    };

    let ip = ip_str
        .parse::<IpAddr>()
        .map_err(|e| ScopeError::invalid_cidr(cidr, format!("invalid address '{ip_str}': {e}")))?;

    if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScopeError::invalid_cidr(
            cidr,
            format!("invalid prefix '{prefix_str}'"),
        ));
    }
    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| {
            ScopeError::invalid_cidr(cidr, format!("invalid prefix '{prefix_str}': {e}"))
        })?;

    let network = IpNetwork::new(ip, prefix).map_err(|e| ScopeError::invalid_cidr(cidr, e))?;
    IpNetwork::new(network.network(), prefix).map_err(|e| ScopeError::invalid_cidr(cidr, e))
}

/// Expands a CIDR block, or a bare address, into its addresses in ascending order.
///
/// A bare address always yields itself, whatever the flag says.
pub fn expand(cidr: &str, include_network_and_broadcast: bool) -> Result<Expansion> {
    if let Ok(addr) = cidr.parse::<IpAddr>() {
        return Ok(Expansion::single(addr));
    }

    let network = parse_cidr(cidr)?;
    Ok(Expansion::from_network(network, include_network_and_broadcast))
}

/// RFC 1918 for IPv4, unique-local `fc00::/7` for IPv6.
pub fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        IpAddr::V6(v6) => v6.is_unique_local(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
