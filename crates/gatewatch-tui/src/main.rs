//! `gatewatch-tui` — terminal dashboard for a captive-portal gateway.
//!
//! Polls the gateway's admin API for connected guest sessions, renders
//! them with aggregate traffic statistics, and lets the operator
//! disconnect a session behind an explicit confirmation step.
//!
//! Logs are written to a file (default `/tmp/gatewatch-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! session updates from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod data_bridge;
mod event;
mod theme;
mod tui;
mod views;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gatewatch_core::{AdminCredentials, Controller, GatewayConfig, TlsVerification};

use crate::app::App;

/// Terminal dashboard for monitoring and managing captive-portal guest
/// sessions.
#[derive(Parser, Debug)]
#[command(name = "gatewatch-tui", version, about)]
struct Cli {
    /// Gateway URL (e.g. http://192.168.88.2:5000)
    #[arg(short = 'u', long, env = "GATEWATCH_URL")]
    url: Option<String>,

    /// Operator username for the gateway admin login
    #[arg(long, env = "GATEWATCH_USERNAME")]
    username: Option<String>,

    /// Environment variable holding the operator password
    #[arg(long, default_value = "GATEWATCH_PASSWORD")]
    password_env: String,

    /// Config profile name (when no --url is given)
    #[arg(short = 'p', long)]
    profile: Option<String>,

    /// Session poll period in seconds
    #[arg(long, default_value_t = 30)]
    interval: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/gatewatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gatewatch_tui={log_level},gatewatch_core={log_level},gatewatch_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("gatewatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build a [`GatewayConfig`] from CLI args, if a URL was provided.
fn config_from_cli(cli: &Cli) -> Result<Option<GatewayConfig>> {
    let Some(ref url_str) = cli.url else {
        return Ok(None);
    };
    let url = url_str
        .parse()
        .map_err(|e| eyre!("invalid gateway URL {url_str}: {e}"))?;

    let auth = match &cli.username {
        Some(username) => {
            let password = std::env::var(&cli.password_env).map_err(|_| {
                eyre!(
                    "--username given but ${} is not set",
                    cli.password_env
                )
            })?;
            Some(AdminCredentials {
                username: username.clone(),
                password: SecretString::from(password),
            })
        }
        None => None,
    };

    let mut config = GatewayConfig::new(url);
    config.auth = auth;
    config.poll_interval_secs = cli.interval;
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(Some(config))
}

/// Fall back to the shared config file.
fn config_from_file(cli: &Cli) -> Result<Option<GatewayConfig>> {
    let cfg = gatewatch_config::load_config_or_default();
    if cfg.profiles.is_empty() {
        return Ok(None);
    }
    let (name, profile) = gatewatch_config::select_profile(&cfg, cli.profile.as_deref())?;
    let gateway = gatewatch_config::profile_to_gateway_config(profile, name, &cfg.defaults)?;
    Ok(Some(gateway))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        url = cli.url.as_deref().unwrap_or("(from config)"),
        "starting gatewatch-tui"
    );

    // Priority: CLI flags > config file
    let config = match config_from_cli(&cli)? {
        Some(c) => c,
        None => config_from_file(&cli)?.ok_or_else(|| {
            eyre!(
                "no gateway configured: pass --url or create a profile in {}",
                gatewatch_config::config_path().display()
            )
        })?,
    };

    let controller = Controller::new(config)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
