// User-facing error type for the core crate.
//
// Frontends render these directly, so the variants speak the operator's
// language (gateway unreachable, login rejected) rather than HTTP's. The
// translation from `gatewatch_api::Error` happens here and nowhere else.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cannot reach gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("operator login failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("not connected to the gateway")]
    GatewayDisconnected,

    #[error("gateway request timed out")]
    Timeout,

    #[error("no such session: {identifier}")]
    SessionNotFound { identifier: String },

    /// The gateway processed the request and said no. `message` is the
    /// server's text, passed through verbatim.
    #[error("gateway error: {message}")]
    Gateway { message: String },

    /// The request never produced a usable response; only generic detail
    /// is available.
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<gatewatch_api::Error> for CoreError {
    fn from(err: gatewatch_api::Error) -> Self {
        use gatewatch_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::SessionExpired => Self::AuthenticationFailed {
                message: "operator session expired, log in again".into(),
            },
            Api::Transport(ref e) if e.is_timeout() => Self::Timeout,
            Api::Transport(ref e) if e.is_connect() => Self::ConnectionFailed {
                url: e.url().map_or_else(|| "<unknown>".into(), Url::to_string),
                reason: e.to_string(),
            },
            Api::Transport(e) => Self::Transport {
                message: e.to_string(),
            },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            Api::Tls(msg) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS: {msg}"),
            },
            Api::Gateway { message } => Self::Gateway { message },
            Api::Deserialization { message, .. } => {
                Self::Internal(format!("malformed gateway response: {message}"))
            }
        }
    }
}
