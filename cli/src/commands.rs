pub mod add;
pub mod domains;
pub mod exclude;
pub mod expand;
pub mod get;
pub mod ips;
pub mod prune;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use scopr_common::config::{Config, DEFAULT_EXPANSION_LIMIT, DEFAULT_SCOPE, DEFAULT_SCOPE_DIR};
use scopr_core::ScopeRegistry;
use tracing::warn;

#[derive(Parser)]
#[command(name = "scopr")]
#[command(about = "Keep track of what is in scope for a network engagement.")]
#[command(version)]
pub struct CommandLine {
    /// Directory holding one subdirectory per scope
    #[arg(long, global = true, env = "SCOPR_SCOPE_DIR", default_value = DEFAULT_SCOPE_DIR)]
    pub scope_dir: PathBuf,

    /// Name of the scope to work on
    #[arg(short, long, global = true, env = "SCOPR_SCOPE", default_value = DEFAULT_SCOPE)]
    pub scope: String,

    /// Print debug logs
    #[arg(short, long, global = true, env = "SCOPR_DEBUG")]
    pub debug: bool,

    /// Largest CIDR block (in addresses) that will be enumerated
    #[arg(
        long,
        global = true,
        env = "SCOPR_EXPANSION_LIMIT",
        default_value_t = DEFAULT_EXPANSION_LIMIT
    )]
    pub expansion_limit: u128,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add IPs, CIDRs, domains or URLs to the scope unless excluded
    #[command(alias = "a")]
    Add {
        /// Keep network and broadcast addresses when checking CIDRs
        #[arg(short, long)]
        all: bool,
        items: Vec<String>,
    },
    /// Add items to the exclude list
    #[command(alias = "x")]
    Exclude {
        /// Print the exclude list instead
        #[arg(short, long)]
        list: bool,
        items: Vec<String>,
    },
    /// Print only the items that are in scope
    #[command(alias = "p")]
    Prune {
        /// Keep network and broadcast addresses when expanding CIDRs
        #[arg(short, long)]
        all: bool,
        items: Vec<String>,
    },
    /// List the IP addresses and blocks in scope
    #[command(alias = "i")]
    Ips {
        /// Expand CIDR blocks into addresses, dropping excluded ones
        #[arg(short = 'x', long)]
        expand: bool,
        /// Keep network and broadcast addresses when expanding
        #[arg(short, long)]
        all: bool,
    },
    /// List the domains in scope
    #[command(alias = "d")]
    Domains {
        /// Print registrable root domains
        #[arg(short, long)]
        root_domains: bool,
        /// Only print domains ending with this suffix
        #[arg(short = 'S', long)]
        suffix: Option<String>,
        /// With --root-domains, count the stored domains under each root
        #[arg(short, long)]
        totals: bool,
    },
    /// Expand CIDR blocks into addresses without touching any scope
    #[command(alias = "e")]
    Expand {
        /// Keep network and broadcast addresses
        #[arg(short, long)]
        all: bool,
        /// Only print public addresses
        #[arg(long)]
        public: bool,
        /// Only print private addresses
        #[arg(long)]
        private: bool,
        items: Vec<String>,
    },
    /// Print the paths of the scope files
    #[command(alias = "g")]
    Get {
        #[arg(short = '4', long)]
        ipv4: bool,
        #[arg(short = '6', long)]
        ipv6: bool,
        #[arg(short = 'D', long)]
        domain: bool,
        #[arg(short = 'x', long)]
        exclude: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            scope_dir: self.scope_dir.clone(),
            scope: self.scope.clone(),
            debug: self.debug,
            expansion_limit: self.expansion_limit,
        }
    }
}

pub(crate) fn open_registry(cfg: &Config) -> anyhow::Result<ScopeRegistry> {
    ScopeRegistry::from_config(cfg)
        .with_context(|| format!("failed to open scope directory {}", cfg.scope_dir.display()))
}

pub(crate) fn save_registry(registry: &ScopeRegistry) {
    let failures = registry.save();
    if !failures.is_empty() {
        warn!(
            "{} scope file(s) could not be saved, rerun with --debug for details",
            failures.len()
        );
    }
}
