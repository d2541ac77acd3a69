use std::net::IpAddr;

use scopr_common::ScopeError;
use scopr_common::config::Config;
use scopr_common::network::range::{self, is_private};
use tracing::{debug, warn};

use crate::terminal::{input, print};

/// Which addresses of an expanded block get printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Any,
    Public,
    Private,
}

impl Visibility {
    fn from_flags(public: bool, private: bool) -> Self {
        match (public, private) {
            (true, false) => Visibility::Public,
            (false, true) => Visibility::Private,
            _ => Visibility::Any,
        }
    }

    fn keeps(self, ip: &IpAddr) -> bool {
        match self {
            Visibility::Any => true,
            Visibility::Public => !is_private(ip),
            Visibility::Private => is_private(ip),
        }
    }
}

pub fn expand(
    items: Vec<String>,
    all: bool,
    public: bool,
    private: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let visibility = Visibility::from_flags(public, private);

    for item in input::items_or_stdin(items)? {
        let item = item.trim();
        if !item.contains('/') {
            continue;
        }

        let expansion =
            range::expand(item, all).and_then(|a| a.within(item, cfg.expansion_limit));
        let addrs = match expansion {
            Ok(addrs) => addrs,
            Err(e @ ScopeError::ExpansionTooLarge { .. }) => {
                warn!("{e}");
                continue;
            }
            Err(e) => {
                debug!("skipping {item}: {e}");
                continue;
            }
        };

        print::lines(addrs.filter(|ip| visibility.keeps(ip)))?;
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
