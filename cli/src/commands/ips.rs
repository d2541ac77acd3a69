use scopr_common::config::Config;

use super::open_registry;
use crate::terminal::print;

pub fn ips(expand: bool, all: bool, cfg: &Config) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;
    let scope = registry.scope_mut(&cfg.scope)?;

    if expand {
        print::lines(scope.all_expanded(all))
    } else {
        print::lines(scope.all_ips())
    }
}
