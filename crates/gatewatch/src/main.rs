//! `gatewatch` — CLI for the captive-portal gateway admin API.
//!
//! One-shot commands against the gateway: list connected guest sessions,
//! show aggregate traffic, disconnect a session (with confirmation), and
//! trigger a refresh of the external credential mirror.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, TopCommand};
use crate::error::CliError;

fn setup_tracing() {
    // Logs go to stderr, gated by RUST_LOG; table/JSON output stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        TopCommand::Sessions(args) => commands::sessions::handle(args, &cli.global).await,
        TopCommand::Sheet(args) => commands::sheet::handle(args, &cli.global).await,
        TopCommand::Config(args) => commands::config_cmd::handle(&args, &cli.global),
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_tracing();
    run(cli).await?;
    Ok(())
}
