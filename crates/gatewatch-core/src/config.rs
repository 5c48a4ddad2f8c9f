// ── Controller configuration ──

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification mode for the gateway connection.
#[derive(Debug, Clone)]
pub enum TlsVerification {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed gateways).
    DangerAcceptInvalid,
}

/// Operator credentials for the gateway's admin login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Everything the [`Controller`](crate::Controller) needs to talk to one
/// gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway root URL (e.g. `http://192.168.88.2:5000`).
    pub url: Url,
    /// Operator credentials; `None` when the gateway is reachable without
    /// a login (reverse-proxy auth, lab setups).
    pub auth: Option<AdminCredentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Session poll period in seconds. `0` disables the background poll
    /// task (one-shot CLI use).
    pub poll_interval_secs: u64,
}

impl GatewayConfig {
    /// Config with library defaults: 30 s timeout, 30 s poll period,
    /// system TLS, no credentials.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            auth: None,
            tls: TlsVerification::System,
            timeout: Duration::from_secs(30),
            poll_interval_secs: 30,
        }
    }
}
