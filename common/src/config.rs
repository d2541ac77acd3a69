use std::path::PathBuf;

pub const DEFAULT_SCOPE_DIR: &str = "scope";
pub const DEFAULT_SCOPE: &str = "external";

/// Largest block a single expansion may enumerate: a full IPv4 `/12`.
pub const DEFAULT_EXPANSION_LIMIT: u128 = 1 << 20;

#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one subdirectory per named scope.
    pub scope_dir: PathBuf,
    /// Scope the current command acts on.
    pub scope: String,
    /// Surfaces item-level failures that are otherwise swallowed.
    pub debug: bool,
    /// Blocks with more addresses than this are skipped, never truncated.
    pub expansion_limit: u128,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scope_dir: PathBuf::from(DEFAULT_SCOPE_DIR),
            scope: DEFAULT_SCOPE.to_string(),
            debug: false,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}
