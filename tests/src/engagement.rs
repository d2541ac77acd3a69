#![cfg(test)]
use scopr_common::config::DEFAULT_SCOPE;
use scopr_core::ScopeRegistry;
use tempfile::TempDir;

fn engagement(dir: &TempDir) -> ScopeRegistry {
    let mut registry = ScopeRegistry::open(dir.path()).unwrap();
    let scope = registry.scope_mut(DEFAULT_SCOPE).unwrap();
    scope.add_exclude(["10.42.0.0/31", "notinscope.inscope.tld"]);
    let report = scope.add(
        false,
        [
            "10.42.0.0/30",
            "10.42.2.42",
            "10.42.0.1",
            "2001:db8::/64",
            "inscope.tld",
            "alsovalidscope.tld",
            "notinscope.inscope.tld",
            "deep.notinscope.inscope.tld",
            "not a host",
        ],
    );
    assert_eq!(report.added, 5);
    assert_eq!(report.excluded, 3);
    assert_eq!(report.invalid, 1);
    assert!(registry.save().is_empty());
    registry
}

/// Scope survives a save and reload, and prune answers the same afterwards.
#[test]
fn prune_after_reload() {
    let dir = TempDir::new().unwrap();
    drop(engagement(&dir));

    let registry = ScopeRegistry::open(dir.path()).unwrap();
    let scope = registry.scope(DEFAULT_SCOPE).unwrap();

    let kept = scope.prune(
        false,
        [
            "10.42.0.1",
            "10.42.0.2",
            "10.42.2.42",
            "10.42.3.1",
            "https://api.inscope.tld/v1",
            "notinscope.inscope.tld",
            "x.notinscope.inscope.tld",
            "elsewhere.tld",
            "2001:db8::1",
        ],
    );

    assert_eq!(
        kept,
        vec!["10.42.0.2", "10.42.2.42", "2001:db8::1", "https://api.inscope.tld/v1"]
    );
}

#[test]
fn expanded_ips_skip_excluded_addresses() {
    let dir = TempDir::new().unwrap();
    let registry = engagement(&dir);
    let scope = registry.scope(DEFAULT_SCOPE).unwrap();

    // 10.42.0.0/30 without network/broadcast is .1 and .2; .1 is excluded.
    // The /64 is far beyond the expansion limit and is skipped.
    assert_eq!(scope.all_expanded(false), vec!["10.42.0.2", "10.42.2.42"]);
}

#[test]
fn root_domains_after_reload() {
    let dir = TempDir::new().unwrap();
    drop(engagement(&dir));

    let registry = ScopeRegistry::open(dir.path()).unwrap();
    assert_eq!(
        registry.scope(DEFAULT_SCOPE).unwrap().root_domains(),
        vec!["alsovalidscope.tld", "inscope.tld"]
    );
}
