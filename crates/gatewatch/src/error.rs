//! CLI error type with terminal diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use gatewatch_config::ConfigError;
use gatewatch_core::CoreError;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("{resource_type} not found: {identifier}")]
    #[diagnostic(
        code(gatewatch::not_found),
        help("run `gatewatch {list_command}` to see what is connected")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("no operator password available")]
    #[diagnostic(
        code(gatewatch::missing_password),
        help("set ${env}, store one in the keyring, or run interactively to be prompted")
    )]
    MissingPassword { env: String },

    #[error(transparent)]
    #[diagnostic(code(gatewatch::gateway))]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(code(gatewatch::config))]
    Config(#[from] ConfigError),

    #[error("prompt failed: {0}")]
    #[diagnostic(code(gatewatch::prompt))]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    #[diagnostic(code(gatewatch::io))]
    Io(#[from] std::io::Error),
}
