use scopr_common::config::Config;
use tracing::info;

use super::{open_registry, save_registry};
use crate::terminal::{input, print};

pub fn exclude(items: Vec<String>, list: bool, cfg: &Config) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;

    if list {
        return print::lines(registry.scope_mut(&cfg.scope)?.excludes());
    }

    let items = input::items_or_stdin(items)?;
    let added = registry.scope_mut(&cfg.scope)?.add_exclude(&items);
    info!("{added} exclusion(s) added");

    save_registry(&registry);
    Ok(())
}
