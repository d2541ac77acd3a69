mod commands;
mod terminal;

use commands::{CommandLine, Commands, add, domains, exclude, expand, get, ips, prune};
use terminal::logging;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.debug);

    let cfg = commands.config();

    match commands.command {
        Commands::Add { all, items } => add::add(items, all, &cfg),
        Commands::Exclude { list, items } => exclude::exclude(items, list, &cfg),
        Commands::Prune { all, items } => prune::prune(items, all, &cfg),
        Commands::Ips { expand, all } => ips::ips(expand, all, &cfg),
        Commands::Domains {
            root_domains,
            suffix,
            totals,
        } => domains::domains(root_domains, suffix, totals, &cfg),
        Commands::Expand {
            all,
            public,
            private,
            items,
        } => expand::expand(items, all, public, private, &cfg),
        Commands::Get {
            ipv4,
            ipv6,
            domain,
            exclude,
        } => get::get(ipv4, ipv6, domain, exclude, &cfg),
    }
}
