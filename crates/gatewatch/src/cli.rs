//! Command-line definitions (clap derive).

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Manage captive-portal guest sessions from the command line.
#[derive(Debug, Parser)]
#[command(name = "gatewatch", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: TopCommand,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway URL (e.g. http://192.168.88.2:5000)
    #[arg(short = 'u', long, global = true, env = "GATEWATCH_URL")]
    pub url: Option<String>,

    /// Operator username for the gateway admin login
    #[arg(long, global = true, env = "GATEWATCH_USERNAME")]
    pub username: Option<String>,

    /// Environment variable holding the operator password
    #[arg(long, global = true, default_value = "GATEWATCH_PASSWORD")]
    pub password_env: String,

    /// Config profile name (when no --url is given)
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Color output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum TopCommand {
    /// Inspect and manage connected guest sessions
    Sessions(SessionsArgs),
    /// External credential mirror operations
    Sheet(SheetArgs),
    /// Configuration helpers
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub command: SessionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List currently connected sessions
    List,
    /// Aggregate statistics for the current snapshot
    Stats,
    /// Disconnect a session (by id or user identity)
    Disconnect {
        /// Session id or user identity
        session: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct SheetArgs {
    #[command(subcommand)]
    pub command: SheetCommand,
}

#[derive(Debug, Subcommand)]
pub enum SheetCommand {
    /// Re-pull the credential mirror on the gateway
    Refresh,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Write a starter config file with one profile
    Init {
        /// Gateway base URL for the default profile
        #[arg(long)]
        gateway: String,

        /// Operator username for the default profile
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Yaml,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
