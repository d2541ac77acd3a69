//! # Scope Item Normalization
//!
//! Reduces whatever a user pastes into a scope list to its canonical token:
//!
//! * `10.0.0.1/24` becomes the network form `10.0.0.0/24`.
//! * `https://host.tld:8443/path?q=1`, `host.tld:443` and `host.tld.` all become `host.tld`.
//! * Bare IPv6 literals are bracketed so they survive the URL parse, then printed compressed.
//! * Only a dotted quad is an IPv4 address; `10.1` or `167772161` stay as written.
//!
//! Everything that is not a CIDR goes through one URL parse, which is what
//! keeps bare hosts, `host:port` pairs and full URLs on a single code path.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;
use url::{Host, Url};

use crate::error::{Result, ScopeError};
use crate::network::range;

const SCHEME_SEPARATOR: &str = "://";
const DEFAULT_SCHEME: &str = "https://";

/// Runs of four hex digits joined by `:` or `::`, ending in four hex digits.
static BARE_IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("([0-9a-f]{4}::?)+([0-9a-f]{4})").expect("bare IPv6 pattern is valid")
});

/// Converts a raw scope item into its canonical token.
///
/// Fails with [`ScopeError::InvalidToken`] when no host, address or CIDR can be
/// recovered. Normalizing a canonical token returns it unchanged.
pub fn normalize(raw: &str) -> Result<String> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ScopeError::InvalidToken(raw.to_string()));
    }

    let has_scheme = token.contains(SCHEME_SEPARATOR);

    if !has_scheme && token.contains('/') {
        if let Ok(network) = range::parse_cidr(token) {
            return Ok(network.to_string());
        }
    }

    let host = if has_scheme {
        host_of(token)
    } else if looks_like_bare_ipv6(token) {
        host_of(&format!("{DEFAULT_SCHEME}[{token}]"))
            .or_else(|| host_of(&format!("{DEFAULT_SCHEME}{token}")))
    } else {
        host_of(&format!("{DEFAULT_SCHEME}{token}"))
    };

    host.ok_or_else(|| ScopeError::InvalidToken(raw.to_string()))
}

/// Heuristic for an IPv6 literal written without brackets.
///
/// `host:port` pairs made only of hex digits (`cafe:8080`) match too; callers
/// retry without brackets when the bracketed form does not parse.
fn looks_like_bare_ipv6(token: &str) -> bool {
    token.parse::<Ipv6Addr>().is_ok() || BARE_IPV6.is_match(&token.to_ascii_lowercase())
}

fn host_of(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate).ok()?;
    let host = match url.host()? {
        Host::Domain(domain) => domain.trim_end_matches('.').to_string(),
        Host::Ipv4(addr) => match written_host(candidate) {
            Some(written) if written.parse::<Ipv4Addr>() == Ok(addr) => addr.to_string(),
            // shorthand and numeric forms (`10.1`, `167772161`) name no address
            Some(written) => written,
            None => return None,
        },
        Host::Ipv6(addr) => addr.to_string(),
    };

    (!host.is_empty()).then_some(host)
}

/// The host exactly as written in a `scheme://` URL, lowercased, without
/// userinfo, port or trailing dots.
fn written_host(candidate: &str) -> Option<String> {
    let (_, rest) = candidate.split_once(SCHEME_SEPARATOR)?;
    let authority = rest.split(['/', '\\', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host_port.split(':').next()?;

    Some(host.trim_end_matches('.').to_ascii_lowercase())
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

    #[test]
    fn test_normalize_table() {
        let cases = [
            ("10.0.0.1", "10.0.0.1"),
            ("  10.0.0.1  ", "10.0.0.1"),
            ("10.0.0.1/24", "10.0.0.0/24"),
            ("whatever.dead", "whatever.dead"),
            ("https://whatever.dead", "whatever.dead"),
            ("https://whatever.dead/place/?t=test.com", "whatever.dead"),
            (
                "fda4:20e2:424d:cad4:e96:4b42:2fe1:46fb",
                "fda4:20e2:424d:cad4:e96:4b42:2fe1:46fb",
            ),
            (
                "fda4:20e2:424d:cad4:e96:4b42:2fe1:46fb/62",
                "fda4:20e2:424d:cad4::/62",
            ),
            ("asdf.com.test:443", "asdf.com.test"),
            ("https://asdf.com.test:443/face", "asdf.com.test"),
        ];

        for (raw, want) in cases {
            assert_eq!(normalize(raw).unwrap(), want, "normalizing {raw:?}");
        }
    }

    #[test]
    fn test_normalize_strips_trailing_dot() {
        assert_eq!(normalize("example.com.").unwrap(), "example.com");
        assert_eq!(normalize("https://example.com./x").unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_ipv6_forms() {
        assert_eq!(
            normalize("2001:0db8:0000:0000:0000:ff00:0042:8329").unwrap(),
            "2001:db8::ff00:42:8329"
        );
        assert_eq!(normalize("::1").unwrap(), "::1");
        assert_eq!(normalize("[2001:db8::1]:443").unwrap(), "2001:db8::1");
        assert_eq!(normalize("https://[2001:db8::1]/index.html").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_normalize_keeps_shorthand_ipv4_literal() {
        assert_eq!(normalize("192.168.1").unwrap(), "192.168.1");
        assert_eq!(normalize("10.1").unwrap(), "10.1");
        assert_eq!(normalize("167772161").unwrap(), "167772161");
        assert_eq!(normalize("0X7F.1").unwrap(), "0x7f.1");
        assert_eq!(normalize("https://167772161:8443/x").unwrap(), "167772161");
    }

    #[test]
    fn test_normalize_dotted_quad_through_url() {
        assert_eq!(normalize("https://10.0.0.1:8443/x").unwrap(), "10.0.0.1");
        assert_eq!(normalize("https://user@10.0.0.1/").unwrap(), "10.0.0.1");
        assert_eq!(normalize("10.0.0.1.").unwrap(), "10.0.0.1");
        assert_eq!(normalize("10.0.0.1:80").unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_normalize_hex_host_with_port() {
        assert_eq!(normalize("cafe:8080").unwrap(), "cafe");
    }

    #[test]
    fn test_normalize_invalid() {
        assert!(matches!(normalize(""), Err(ScopeError::InvalidToken(_))));
        assert!(matches!(normalize("   "), Err(ScopeError::InvalidToken(_))));
        assert!(normalize("https://").is_err());
        assert!(normalize("not a host").is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "10.0.0.1",
            " 10.0.0.1/24 ",
            "Whatever.Dead",
            "https://admin.stillinscope.inscope.tld:8443/garbage.html",
            "fda4:20e2:424d:cad4:e96:4b42:2fe1:46fb/62",
            "2001:0db8:0000:0000:0000:ff00:0042:8329",
            "asdf.com.test:443",
            "10.0.0.1.xip.io",
            "example.com.",
            "192.168.1",
            "167772161",
        ];

        for raw in inputs {
            let once = normalize(raw).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice, "normalizing {raw:?} twice");
        }
    }
}
