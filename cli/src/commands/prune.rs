use scopr_common::config::Config;

use super::open_registry;
use crate::terminal::{input, print};

pub fn prune(items: Vec<String>, all: bool, cfg: &Config) -> anyhow::Result<()> {
    let items = input::items_or_stdin(items)?;
    let mut registry = open_registry(cfg)?;

    print::lines(registry.scope_mut(&cfg.scope)?.prune(all, &items))
}
