//! Parsed views over a scope's string sets, rebuilt after the sets change.

use std::collections::HashSet;
use std::net::IpAddr;

use pnet::ipnetwork::IpNetwork;
use scopr_common::network::range::{Family, network_bounds, to_u128};
use scopr_common::{ScopeItem, classify};
use tracing::debug;

/// Entries of one string set split by kind.
#[derive(Debug, Default)]
pub(crate) struct EntryIndex {
    pub networks: Vec<IpNetwork>,
    pub addrs: HashSet<IpAddr>,
    pub hostnames: Vec<String>,
}

impl EntryIndex {
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a String>) -> Self {
        let mut index = Self::default();

        for entry in entries {
            match classify(entry) {
                ScopeItem::Ipv4Cidr(net) => index.networks.push(IpNetwork::V4(net)),
                ScopeItem::Ipv6Cidr(net) => index.networks.push(IpNetwork::V6(net)),
                ScopeItem::Ipv4Address(addr) => {
                    index.addrs.insert(IpAddr::V4(addr));
                }
                ScopeItem::Ipv6Address(addr) => {
                    index.addrs.insert(IpAddr::V6(addr));
                }
                ScopeItem::Domain(domain) => index.hostnames.push(domain),
                ScopeItem::Invalid => debug!(entry = %entry, "ignoring unparsable scope entry"),
            }
        }

        index
    }

    /// Exact address match, or containment in any stored block.
    pub fn matches_ip(&self, ip: IpAddr) -> bool {
        self.addrs.contains(&ip) || self.networks.iter().any(|net| net.contains(ip))
    }

    /// Address spans of one family, as inclusive integer ranges.
    fn spans(&self, family: Family) -> impl Iterator<Item = (u128, u128)> + '_ {
        let networks = self.networks.iter().map(network_bounds);
        let addrs = self.addrs.iter().map(|addr| {
            let (family, value) = to_u128(*addr);
            (family, value, value)
        });

        networks
            .chain(addrs)
            .filter(move |(f, _, _)| *f == family)
            .map(|(_, start, end)| (start, end))
    }

    /// Whether any entry shares at least one address with `start..=end`.
    pub fn overlaps_range(&self, family: Family, start: u128, end: u128) -> bool {
        self.spans(family).any(|(s, e)| s <= end && start <= e)
    }

    /// Whether the union of all entries covers every address of `start..=end`.
    pub fn covers_range(&self, family: Family, start: u128, end: u128) -> bool {
        let mut spans: Vec<(u128, u128)> = self.spans(family).collect();
        spans.sort_unstable();

        let mut next = start;
        for (s, e) in spans {
            if e < next {
                continue;
            }
            if s > next {
                return false;
            }
            if e >= end {
                return true;
            }
            next = e + 1;
        }
        false
    }

    /// Exact hostname match, or `domain` sits below a stored hostname.
    pub fn matches_domain(&self, domain: &str) -> bool {
        self.hostnames
            .iter()
            .any(|host| host == domain || is_subdomain(domain, host))
    }
}

/// True when `domain` ends with `.parent`.
pub(crate) fn is_subdomain(domain: &str, parent: &str) -> bool {
    domain.len() > parent.len()
        && domain.ends_with(parent)
        && domain.as_bytes()[domain.len() - parent.len() - 1] == b'.'
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[&str]) -> EntryIndex {
        let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        EntryIndex::build(&entries)
    }

    fn bounds(cidr: &str) -> (Family, u128, u128) {
        network_bounds(&scopr_common::network::range::parse_cidr(cidr).unwrap())
    }

    #[test]
    fn test_is_subdomain_respects_label_boundary() {
        assert!(is_subdomain("api.inscope.tld", "inscope.tld"));
        assert!(is_subdomain("a.b.inscope.tld", "inscope.tld"));
        assert!(!is_subdomain("inscope.tld", "inscope.tld"));
        assert!(!is_subdomain("notinscope.tld", "inscope.tld"));
        assert!(!is_subdomain("tld", "inscope.tld"));
    }

    #[test]
    fn test_build_splits_by_kind() {
        let index = index(&[
            "10.42.0.0/31",
            "10.42.0.9",
            "2001:db8::/64",
            "admin.inscope.tld",
            "bad/entry",
        ]);

        assert_eq!(index.networks.len(), 2);
        assert_eq!(index.addrs.len(), 1);
        assert_eq!(index.hostnames, vec!["admin.inscope.tld".to_string()]);

        assert!(index.matches_ip("10.42.0.1".parse().unwrap()));
        assert!(index.matches_ip("10.42.0.9".parse().unwrap()));
        assert!(!index.matches_ip("10.42.0.2".parse().unwrap()));
        assert!(index.matches_ip("2001:db8::42".parse().unwrap()));
        assert!(index.matches_domain("admin.inscope.tld"));
        assert!(index.matches_domain("www.admin.inscope.tld"));
        assert!(!index.matches_domain("inscope.tld"));
    }

    #[test]
    fn test_covers_range_merges_adjacent_entries() {
        let index = index(&["10.0.0.0/25", "10.0.0.128/26", "10.0.0.192/26", "2001:db8::/64"]);

        let (family, start, end) = bounds("10.0.0.0/24");
        assert!(index.covers_range(family, start, end));

        let (family, start, end) = bounds("10.0.0.0/23");
        assert!(!index.covers_range(family, start, end));

        let (family, start, end) = bounds("2001:db8::/96");
        assert!(index.covers_range(family, start, end));
        assert!(!index.covers_range(Family::V4, start, end));
    }

    #[test]
    fn test_covers_range_with_gap() {
        let index = index(&["10.0.0.0/25", "10.0.0.129", "10.0.0.130/31", "10.0.0.132/30"]);
        let (family, start, _) = bounds("10.0.0.0/24");

        // 10.0.0.128 is missing
        assert!(!index.covers_range(family, start, start + 135));
        assert!(index.covers_range(family, start, start + 127));
        assert!(index.covers_range(family, start + 129, start + 135));
    }

    #[test]
    fn test_overlaps_range() {
        let index = index(&["10.200.0.1", "192.168.0.0/16"]);

        let (family, start, end) = bounds("10.0.0.0/8");
        assert!(index.overlaps_range(family, start, end));

        let (family, start, end) = bounds("10.0.0.0/11");
        assert!(!index.overlaps_range(family, start, end));

        let (family, start, end) = bounds("192.168.4.0/24");
        assert!(index.overlaps_range(family, start, end));
    }
}
