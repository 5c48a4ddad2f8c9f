//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use gatewatch_core::{AdminCredentials, GatewayConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the gateway configuration for a command invocation.
///
/// Priority: `--url` and friends, then the config file profile. When a
/// username is given without a resolvable password, an interactive run
/// prompts for one.
pub fn resolve_gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    if let Some(ref url_str) = global.url {
        let url: url::Url = url_str.parse().map_err(|e| {
            CliError::Config(gatewatch_config::ConfigError::Validation {
                field: "url".into(),
                reason: format!("{e}"),
            })
        })?;

        let auth = match &global.username {
            Some(username) => Some(AdminCredentials {
                username: username.clone(),
                password: resolve_password_interactive(&global.password_env)?,
            }),
            None => None,
        };

        let mut config = GatewayConfig::new(url);
        config.auth = auth;
        config.timeout = Duration::from_secs(global.timeout);
        if global.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        // One-shot commands drive refreshes explicitly.
        config.poll_interval_secs = 0;
        return Ok(config);
    }

    let cfg = gatewatch_config::load_config_or_default();
    let (name, profile) = gatewatch_config::select_profile(&cfg, global.profile.as_deref())?;
    tracing::debug!(profile = name, "using config file profile");
    let mut config = gatewatch_config::profile_to_gateway_config(profile, name, &cfg.defaults)?;
    config.poll_interval_secs = 0;
    Ok(config)
}

/// Password from the named env var, falling back to an interactive prompt
/// when stdin is a terminal.
fn resolve_password_interactive(env_name: &str) -> Result<SecretString, CliError> {
    if let Ok(val) = std::env::var(env_name) {
        return Ok(SecretString::from(val));
    }
    if std::io::stdin().is_terminal() {
        let pw = rpassword::prompt_password("Operator password: ")?;
        return Ok(SecretString::from(pw));
    }
    Err(CliError::MissingPassword {
        env: env_name.into(),
    })
}
