//! # Scope Set
//!
//! One engagement's scope: what is included (IPv4, IPv6, domains) and what is
//! excluded, plus the membership rules that tie them together.
//!
//! Exclusion always wins. An address inside an excluded block, or a domain at
//! or below an excluded hostname, is never reported in scope even when a
//! broader include would cover it.
//!
//! Parsed indexes over the string sets are cached in the scope itself and
//! dropped on the next mutation that could change them. The cells make a
//! `Scope` `!Sync`; share one across threads behind a single lock.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::net::IpAddr;

use scopr_common::config::DEFAULT_EXPANSION_LIMIT;
use scopr_common::network::range::{self, Expansion};
use scopr_common::{Bucket, ScopeItem, classify, normalize};
use tracing::{debug, warn};

use crate::store::ScopeFile;

mod index;

use index::{EntryIndex, is_subdomain};

/// What a batch [`Scope::add`] did with its items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Newly inserted entries.
    pub added: usize,
    /// Entries that were already present.
    pub unchanged: usize,
    /// Items rejected by an exclusion.
    pub excluded: usize,
    /// Items that could not be normalized or classified.
    pub invalid: usize,
}

#[derive(Debug)]
pub struct Scope {
    ipv4: BTreeSet<String>,
    ipv6: BTreeSet<String>,
    domains: BTreeSet<String>,
    excludes: BTreeSet<String>,
    expansion_limit: u128,
    exclude_index: OnceCell<EntryIndex>,
    include_index: OnceCell<EntryIndex>,
    root_domains: OnceCell<BTreeSet<String>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self::from_entries(
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }

    /// Builds a scope from already canonical entries, as read back from disk.
    pub fn from_entries(
        ipv4: BTreeSet<String>,
        ipv6: BTreeSet<String>,
        domains: BTreeSet<String>,
        excludes: BTreeSet<String>,
    ) -> Self {
        Self {
            ipv4,
            ipv6,
            domains,
            excludes,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
            exclude_index: OnceCell::new(),
            include_index: OnceCell::new(),
            root_domains: OnceCell::new(),
        }
    }

    pub fn with_expansion_limit(mut self, limit: u128) -> Self {
        self.expansion_limit = limit;
        self
    }

    pub fn set_expansion_limit(&mut self, limit: u128) {
        self.expansion_limit = limit;
    }

    pub fn entries(&self, file: ScopeFile) -> &BTreeSet<String> {
        match file {
            ScopeFile::Ipv4 => &self.ipv4,
            ScopeFile::Ipv6 => &self.ipv6,
            ScopeFile::Domains => &self.domains,
            ScopeFile::Exclude => &self.excludes,
        }
    }

    // ── mutation ────────────────────────────────────────────────────────────

    /// Adds items to scope unless an exclusion forbids them.
    ///
    /// How hard exclusions are checked depends on the item:
    /// * every item is dropped when it exactly matches an exclude entry;
    /// * IPv4 addresses and domains are also dropped when an excluded block
    ///   contains them or an excluded hostname is a parent of them;
    /// * CIDR blocks and IPv6 addresses get no check beyond the exact match.
    ///
    /// TODO: decide whether CIDR and IPv6 adds should get the containment
    /// check too, so that adding `10.0.0.0/24` over an excluded `10.0.0.5`
    /// is rejected instead of stored.
    ///
    /// Unusable items are skipped and never abort the batch.
    pub fn add<I, S>(&mut self, include_network_and_broadcast: bool, items: I) -> AddReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = AddReport::default();

        for raw in items {
            let raw = raw.as_ref();
            let token = match normalize(raw) {
                Ok(token) => token,
                Err(e) => {
                    debug!("skipping scope item: {e}");
                    report.invalid += 1;
                    continue;
                }
            };

            if self.excludes.contains(&token) {
                debug!(item = %token, "scope item is excluded");
                report.excluded += 1;
                continue;
            }

            let accepted = match classify(&token) {
                item @ (ScopeItem::Ipv4Cidr(_) | ScopeItem::Ipv6Cidr(_)) => {
                    if let Some(network) = item.network() {
                        let hosts =
                            Expansion::from_network(network, include_network_and_broadcast).len();
                        debug!(cidr = %token, hosts, "adding CIDR block");
                    }
                    item.bucket().map(|bucket| (bucket, token.clone()))
                }
                ScopeItem::Ipv6Address(addr) => Some((Bucket::Ipv6, addr.to_string())),
                ScopeItem::Ipv4Address(addr) => self
                    .can_add_ip(IpAddr::V4(addr))
                    .then(|| (Bucket::Ipv4, addr.to_string())),
                ScopeItem::Domain(domain) => self
                    .can_add_domain(&domain)
                    .then_some((Bucket::Domains, domain)),
                ScopeItem::Invalid => {
                    debug!(item = %token, "skipping unclassifiable scope item");
                    report.invalid += 1;
                    continue;
                }
            };

            match accepted {
                Some((bucket, entry)) => {
                    if self.insert(bucket, entry) {
                        report.added += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => {
                    debug!(item = %token, "scope item falls under an exclusion");
                    report.excluded += 1;
                }
            }
        }

        report
    }

    /// Excludes items from scope. Exclusions are always accepted.
    ///
    /// Returns the number of new exclude entries.
    pub fn add_exclude<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inserted = 0;
        for raw in items {
            match normalize(raw.as_ref()) {
                Ok(token) => {
                    if self.excludes.insert(token) {
                        inserted += 1;
                    }
                }
                Err(e) => debug!("skipping exclude item: {e}"),
            }
        }

        if inserted > 0 {
            self.exclude_index.take();
        }
        inserted
    }

    fn insert(&mut self, bucket: Bucket, entry: String) -> bool {
        let inserted = match bucket {
            Bucket::Ipv4 => self.ipv4.insert(entry),
            Bucket::Ipv6 => self.ipv6.insert(entry),
            Bucket::Domains => self.domains.insert(entry),
        };

        if inserted {
            match bucket {
                Bucket::Ipv4 | Bucket::Ipv6 => {
                    self.include_index.take();
                }
                Bucket::Domains => {
                    self.root_domains.take();
                }
            }
        }
        inserted
    }

    // ── derived indexes ─────────────────────────────────────────────────────

    fn exclude_index(&self) -> &EntryIndex {
        self.exclude_index
            .get_or_init(|| EntryIndex::build(&self.excludes))
    }

    fn include_index(&self) -> &EntryIndex {
        self.include_index
            .get_or_init(|| EntryIndex::build(self.ipv4.iter().chain(&self.ipv6)))
    }

    fn root_domain_set(&self) -> &BTreeSet<String> {
        self.root_domains.get_or_init(|| {
            self.domains
                .iter()
                .filter_map(|domain| match psl::domain_str(domain) {
                    Some(root) => Some(root.to_string()),
                    None => {
                        debug!(domain = %domain, "no registrable root domain");
                        None
                    }
                })
                .collect()
        })
    }

    // ── queries ─────────────────────────────────────────────────────────────

    pub fn can_add_ip(&self, ip: IpAddr) -> bool {
        self.is_ip_in_scope(ip, false)
    }

    pub fn can_add_domain(&self, domain: &str) -> bool {
        self.is_domain_in_scope(domain, false)
    }

    /// Checks an address against the exclusions, then (when
    /// `must_be_in_scope`) against the included addresses and blocks.
    pub fn is_ip_in_scope(&self, ip: IpAddr, must_be_in_scope: bool) -> bool {
        if self.exclude_index().matches_ip(ip) {
            return false;
        }
        if !must_be_in_scope {
            return true;
        }
        self.include_index().matches_ip(ip)
    }

    /// Checks a canonical domain against the excluded hostnames, then (when
    /// `must_be_in_scope`) against the stored domains.
    ///
    /// A domain is included when it is stored verbatim, or sits anywhere below
    /// the root domain of a stored domain. Siblings of an in-scope subdomain
    /// are therefore in scope too.
    pub fn is_domain_in_scope(&self, domain: &str, must_be_in_scope: bool) -> bool {
        if self.exclude_index().matches_domain(domain) {
            return false;
        }
        if !must_be_in_scope {
            return true;
        }
        if self.domains.contains(domain) {
            return true;
        }
        self.root_domain_set()
            .iter()
            .any(|root| is_subdomain(domain, root))
    }

    /// Whether a raw item (address, CIDR, domain or URL) is in scope.
    ///
    /// A CIDR block is in scope only when every one of its addresses is: no
    /// exclusion touches it and the included entries cover all of it. The
    /// block is compared as a range, so its size does not matter.
    pub fn is_in_scope(&self, item: &str) -> bool {
        let Ok(token) = normalize(item) else {
            return false;
        };

        match classify(&token) {
            ScopeItem::Ipv4Address(addr) => self.is_ip_in_scope(IpAddr::V4(addr), true),
            ScopeItem::Ipv6Address(addr) => self.is_ip_in_scope(IpAddr::V6(addr), true),
            item @ (ScopeItem::Ipv4Cidr(_) | ScopeItem::Ipv6Cidr(_)) => {
                let Some(network) = item.network() else {
                    return false;
                };
                let (family, start, end) = range::network_bounds(&network);
                !self.exclude_index().overlaps_range(family, start, end)
                    && self.include_index().covers_range(family, start, end)
            }
            ScopeItem::Domain(domain) => self.is_domain_in_scope(&domain, true),
            ScopeItem::Invalid => false,
        }
    }

    /// Filters `candidates` down to what is in scope.
    ///
    /// Addresses and CIDR blocks are expanded and reported as the individual
    /// in-scope addresses. Anything else is reported exactly as given, so a
    /// URL that points at an in-scope host comes back untouched.
    ///
    /// The result is sorted and free of duplicates.
    pub fn prune<I, S>(&self, include_network_and_broadcast: bool, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = BTreeSet::new();

        for candidate in candidates {
            let raw = candidate.as_ref();
            let token = match normalize(raw) {
                Ok(token) => token,
                Err(e) => {
                    debug!("skipping prune candidate: {e}");
                    continue;
                }
            };

            match range::expand(&token, include_network_and_broadcast) {
                Ok(addrs) => match addrs.within(&token, self.expansion_limit) {
                    Ok(addrs) => results.extend(
                        addrs
                            .filter(|ip| self.is_ip_in_scope(*ip, true))
                            .map(|ip| ip.to_string()),
                    ),
                    Err(e) => warn!("{e}"),
                },
                Err(_) => {
                    if self.is_in_scope(&token) {
                        results.insert(raw.to_string());
                    }
                }
            }
        }

        results.into_iter().collect()
    }

    /// Every concrete address this scope allows: stored addresses and blocks,
    /// expanded, with exclusions removed.
    pub fn all_expanded(&self, include_network_and_broadcast: bool) -> Vec<String> {
        self.prune(include_network_and_broadcast, self.all_ips())
    }

    /// Stored IPv4 entries, then stored IPv6 entries, each sorted.
    pub fn all_ips(&self) -> Vec<String> {
        self.ipv4.iter().chain(&self.ipv6).cloned().collect()
    }

    pub fn all_domains(&self) -> Vec<String> {
        self.domains.iter().cloned().collect()
    }

    /// The registrable root domain (effective TLD plus one) of every stored domain.
    pub fn root_domains(&self) -> Vec<String> {
        self.root_domain_set().iter().cloned().collect()
    }

    pub fn excludes(&self) -> Vec<String> {
        self.excludes.iter().cloned().collect()
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
