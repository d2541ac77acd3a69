use scopr_common::config::Config;

use super::open_registry;
use crate::terminal::print;

pub fn domains(
    root_domains: bool,
    suffix: Option<String>,
    totals: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;
    let scope = registry.scope_mut(&cfg.scope)?;

    if !root_domains {
        return print::lines(filter_suffix(scope.all_domains(), suffix.as_deref()));
    }

    let roots = filter_suffix(scope.root_domains(), suffix.as_deref());
    if !totals {
        return print::lines(roots);
    }

    let stored = scope.all_domains();
    print::lines(roots.into_iter().map(|root| {
        let count = stored.iter().filter(|d| is_under(d, &root)).count();
        format!("{root} {count}")
    }))
}

fn filter_suffix(domains: Vec<String>, suffix: Option<&str>) -> Vec<String> {
    domains
        .into_iter()
        .filter(|d| suffix.is_none_or(|s| d.ends_with(s)))
        .collect()
}

fn is_under(domain: &str, root: &str) -> bool {
    domain == root
        || domain
            .strip_suffix(root)
            .is_some_and(|head| head.ends_with('.'))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
