// HTTP transport construction for the gateway client.
//
// One place decides TLS verification, the request timeout, and the cookie
// jar that carries the operator session. Redirect following stays off for
// every client built here: the gateway expresses "not logged in" as a 302
// to its login page, and callers need to see that status, not the page.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// How to verify the gateway's TLS certificate.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// System certificate store.
    System,
    /// Trust a specific CA certificate (PEM file).
    CustomCa(PathBuf),
    /// Skip verification entirely (self-signed lab gateways).
    DangerAcceptInvalid,
}

/// Transport settings shared by every request a client makes.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Attach a fresh cookie jar for the operator session.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }

    /// Build the `reqwest::Client` these settings describe.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("gatewatch/", env!("CARGO_PKG_VERSION")));

        builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        if let Some(jar) = &self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA cert {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("invalid CA cert {}: {e}", path.display())))
}
