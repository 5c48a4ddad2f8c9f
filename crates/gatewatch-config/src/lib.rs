//! Shared configuration for the gatewatch CLI and TUI.
//!
//! One TOML file holds named gateway profiles plus global defaults;
//! environment variables prefixed `GATEWATCH_` override file values.
//! Operator passwords resolve through a chain (env var, system keyring,
//! plaintext in the file) so the plaintext option is a last resort, not
//! the norm.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatewatch_core::{AdminCredentials, GatewayConfig, TlsVerification};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' names a username but no password source resolved one")]
    NoCredentials { profile: String },

    #[error("no profile named '{profile}' in the config file")]
    UnknownProfile { profile: String },

    #[error("could not serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("could not load config: {0}")]
    Figment(Box<figment::Error>),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File shape ──────────────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Global fallbacks a profile may override per field.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default::output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout, seconds.
    #[serde(default = "default::thirty")]
    pub timeout: u64,

    /// Session poll period for the TUI, seconds.
    #[serde(default = "default::thirty")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default::output(),
            insecure: false,
            timeout: default::thirty(),
            poll_interval: default::thirty(),
        }
    }
}

mod default {
    pub(super) fn output() -> String {
        "table".into()
    }
    pub(super) fn thirty() -> u64 {
        30
    }
}

/// One gateway the operator manages.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway base URL (e.g. "http://192.168.88.2:5000").
    pub gateway: String,

    /// Operator username for the admin login. Absent means the gateway is
    /// reachable without one (reverse-proxy auth, lab setups).
    pub username: Option<String>,

    /// Plaintext operator password. Prefer `password_env` or the keyring.
    pub password: Option<String>,

    /// Name of an environment variable holding the operator password.
    pub password_env: Option<String>,

    /// CA certificate to trust for this gateway.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
    pub timeout: Option<u64>,
    pub poll_interval: Option<u64>,
}

// ── Loading and saving ──────────────────────────────────────────────

/// Where the config file lives, by platform convention.
pub fn config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("dev", "gatewatch", "gatewatch") {
        return dirs.config_dir().join("config.toml");
    }
    // No home directory resolvable; fall back to an XDG-style path.
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    [home.as_str(), ".config", "gatewatch", "config.toml"]
        .iter()
        .collect()
}

/// Load the effective config: built-in defaults, then the file, then
/// `GATEWATCH_`-prefixed environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("GATEWATCH_").split("_"))
        .extract()?;
    Ok(config)
}

/// Like [`load_config`], but a missing or broken file yields defaults.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write the config back to its canonical path, creating directories as
/// needed.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the operator password for a profile.
///
/// Order: the profile's named env var, the system keyring entry
/// `gatewatch/<profile>/password`, then plaintext in the file.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    let from_env = profile
        .password_env
        .as_ref()
        .and_then(|name| std::env::var(name).ok());
    if let Some(val) = from_env {
        return Ok(SecretString::from(val));
    }

    let from_keyring = keyring::Entry::new("gatewatch", &format!("{profile_name}/password"))
        .and_then(|entry| entry.get_password());
    if let Ok(secret) = from_keyring {
        return Ok(SecretString::from(secret));
    }

    profile
        .password
        .as_ref()
        .map(|pw| SecretString::from(pw.clone()))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve [`AdminCredentials`] for a profile, or `None` when it has no
/// username and the gateway needs no operator login.
pub fn resolve_auth(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<AdminCredentials>, ConfigError> {
    let Some(ref username) = profile.username else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name)?;
    Ok(Some(AdminCredentials {
        username: username.clone(),
        password,
    }))
}

// ── Translation to the core config ──────────────────────────────────

/// Turn a profile (plus global defaults) into a [`GatewayConfig`].
pub fn profile_to_gateway_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<GatewayConfig, ConfigError> {
    let url = profile
        .gateway
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "gateway".into(),
            reason: format!("not a URL: {}", profile.gateway),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else {
        match &profile.ca_cert {
            Some(path) => TlsVerification::CustomCa(path.clone()),
            None => TlsVerification::System,
        }
    };

    Ok(GatewayConfig {
        url,
        auth: resolve_auth(profile, profile_name)?,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval_secs: profile.poll_interval.unwrap_or(defaults.poll_interval),
    })
}

/// Find a profile by explicit name, falling back to the configured
/// default.
pub fn select_profile<'a>(
    config: &'a Config,
    name: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let wanted = name
        .or(config.default_profile.as_deref())
        .unwrap_or("default");
    match config.profiles.get(wanted) {
        Some(profile) => Ok((wanted, profile)),
        None => Err(ConfigError::UnknownProfile {
            profile: wanted.into(),
        }),
    }
}
