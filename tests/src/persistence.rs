#![cfg(test)]
use scopr_common::config::{Config, DEFAULT_SCOPE};
use scopr_core::{ScopeFile, ScopeRegistry};
use std::fs;
use tempfile::TempDir;

/// Everything added through one registry is visible after reopening the directory.
#[test]
fn registry_round_trip() {
    let dir = TempDir::new().unwrap();

    let mut registry = ScopeRegistry::open(dir.path()).unwrap();
    let scope = registry.scope_mut(DEFAULT_SCOPE).unwrap();
    scope.add(false, ["10.42.0.0/30", "https://Console.InScope.tld:8443/", "2001:db8::/64"]);
    scope.add_exclude(["notinscope.inscope.tld"]);
    assert!(registry.save().is_empty());

    let reopened = ScopeRegistry::open(dir.path()).unwrap();
    let scope = reopened.scope(DEFAULT_SCOPE).unwrap();
    assert_eq!(scope.all_ips(), vec!["10.42.0.0/30", "2001:db8::/64"]);
    assert_eq!(scope.all_domains(), vec!["console.inscope.tld"]);
    assert_eq!(scope.excludes(), vec!["notinscope.inscope.tld"]);
}

#[test]
fn files_are_sorted_with_one_trailing_newline() {
    let dir = TempDir::new().unwrap();

    let mut registry = ScopeRegistry::open(dir.path()).unwrap();
    registry
        .scope_mut(DEFAULT_SCOPE)
        .unwrap()
        .add(false, ["b.example.com", "a.example.com", "c.example.com"]);
    assert!(registry.save().is_empty());

    let path = registry.file_path(DEFAULT_SCOPE, ScopeFile::Domains);
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "a.example.com\nb.example.com\nc.example.com\n"
    );
    assert_eq!(
        fs::read_to_string(registry.file_path(DEFAULT_SCOPE, ScopeFile::Exclude)).unwrap(),
        ""
    );
}

/// Hand-edited files with duplicates, blank lines and a missing file still load.
#[test]
fn hand_edited_scope_loads() {
    let dir = TempDir::new().unwrap();
    let scope_dir = dir.path().join("internal");
    fs::create_dir_all(&scope_dir).unwrap();
    fs::write(scope_dir.join("ipv4.txt"), "10.0.0.1\n\n10.0.0.1\n  192.168.0.0/24  \n").unwrap();
    fs::write(scope_dir.join("domains.txt"), "corp.example\n").unwrap();

    let registry = ScopeRegistry::open(dir.path()).unwrap();
    let scope = registry.scope("internal").unwrap();

    assert_eq!(scope.all_ips(), vec!["10.0.0.1", "192.168.0.0/24"]);
    assert_eq!(scope.all_domains(), vec!["corp.example"]);
    assert!(scope.excludes().is_empty());
    assert!(registry.scope(DEFAULT_SCOPE).is_none());
}

#[test]
fn scopes_are_independent() {
    let dir = TempDir::new().unwrap();
    let cfg = Config {
        scope_dir: dir.path().join("scope"),
        ..Config::default()
    };

    let mut registry = ScopeRegistry::from_config(&cfg).unwrap();
    registry.scope_mut("external").unwrap().add(false, ["example.com"]);
    registry.scope_mut("internal").unwrap().add(false, ["10.0.0.0/8"]);
    assert!(registry.save().is_empty());

    let reopened = ScopeRegistry::from_config(&cfg).unwrap();
    assert_eq!(reopened.names().collect::<Vec<_>>(), vec!["external", "internal"]);
    assert!(reopened.scope("external").unwrap().all_ips().is_empty());
    assert!(reopened.scope("internal").unwrap().all_domains().is_empty());
}
