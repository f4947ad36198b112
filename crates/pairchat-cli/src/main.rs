//! Pairchat console driver entry point

mod cli;
mod config;
mod console;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pairchat_runtime::RuntimeBuilder;

use crate::cli::Cli;
use crate::config::CliAppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.print_example_config {
        println!("{}", CliAppConfig::example_config());
        return Ok(());
    }

    let config = CliAppConfig::load_with_overrides(
        args.config.as_deref(),
        args.admin_id,
        args.search_timeout_ms,
        args.verbose,
    )
    .context("failed to load configuration")?;

    init_logging(config.console.verbose);

    let runtime = RuntimeBuilder::new()
        .with_config(config.engine.clone())
        .build_and_start()
        .await
        .context("failed to start engine")?;

    console::run(runtime, &config).await
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
