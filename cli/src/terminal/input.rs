use std::io::{self, BufRead};

use anyhow::Context;

/// Positional items when given, otherwise every line of stdin.
pub fn items_or_stdin(items: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !items.is_empty() {
        return Ok(items);
    }

    io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .context("failed to read items from stdin")
}
