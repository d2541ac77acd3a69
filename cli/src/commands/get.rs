use scopr_common::config::Config;
use scopr_core::ScopeFile;

use super::open_registry;
use crate::terminal::print;

pub fn get(
    ipv4: bool,
    ipv6: bool,
    domain: bool,
    exclude: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let registry = open_registry(cfg)?;

    let selected = [
        (ipv4, ScopeFile::Ipv4),
        (ipv6, ScopeFile::Ipv6),
        (domain, ScopeFile::Domains),
        (exclude, ScopeFile::Exclude),
    ];

    print::lines(
        selected
            .into_iter()
            .filter(|(wanted, _)| *wanted)
            .map(|(_, file)| registry.file_path(&cfg.scope, file).display().to_string()),
    )
}
