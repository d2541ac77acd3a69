use scopr_common::config::Config;
use tracing::info;

use super::{open_registry, save_registry};
use crate::terminal::input;

pub fn add(items: Vec<String>, all: bool, cfg: &Config) -> anyhow::Result<()> {
    let items = input::items_or_stdin(items)?;
    let mut registry = open_registry(cfg)?;

    let report = registry.scope_mut(&cfg.scope)?.add(all, &items);
    info!(
        "{} added, {} already present, {} excluded, {} invalid",
        report.added, report.unchanged, report.excluded, report.invalid
    );

    save_registry(&registry);
    Ok(())
}
