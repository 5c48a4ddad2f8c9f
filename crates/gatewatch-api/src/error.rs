use thiserror::Error;

/// Failures a gateway request can produce.
///
/// Callers care about two families: transport failures, where the request
/// never yielded a parseable envelope and no server detail exists, and
/// gateway-reported failures (`success: false`), whose message is carried
/// verbatim for the operator. `gatewatch-core` translates both into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Operator login rejected.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// An API call was redirected to the login page, meaning the operator
    /// session cookie is gone or expired.
    #[error("operator session expired, log in again")]
    SessionExpired,

    /// The request never completed (refused connection, DNS, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// The gateway answered `success: false`; `message` is its text,
    /// unmodified.
    #[error("gateway reported: {message}")]
    Gateway { message: String },

    /// A 2xx response whose body did not match the expected envelope.
    /// The raw body rides along for debugging.
    #[error("unexpected response shape: {message}")]
    Deserialization { message: String, body: String },
}
