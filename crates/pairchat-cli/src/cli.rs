//! Command line argument definitions

use std::path::PathBuf;

use clap::Parser;

/// Console driver for the Pairchat matchmaking engine.
///
/// Plays the role of the messaging-platform transport: type inbound
/// participant actions on stdin and watch the engine's outbound effects.
#[derive(Debug, Parser)]
#[command(name = "pairchat", version, about)]
pub struct Cli {
    /// Path to a configuration file (defaults to pairchat.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chat id treated as the administrator for ban/unban/stats
    #[arg(long)]
    pub admin_id: Option<i64>,

    /// Override the search timeout in milliseconds
    #[arg(long)]
    pub search_timeout_ms: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    pub print_example_config: bool,
}
