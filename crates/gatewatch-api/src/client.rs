// Gateway admin API HTTP client
//
// Wraps `reqwest::Client` with gateway-specific URL construction and
// `{ success, ... }` envelope unwrapping. The operator session is a plain
// cookie established by a form login; redirects are never followed (see
// `transport`), so auth expiry shows up as a redirect status here.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ActiveSession, SessionListResponse, SheetRefresh, StatusResponse};
use crate::transport::TransportConfig;

/// HTTP client for the captive-portal gateway's admin API.
///
/// All methods return unwrapped payloads -- the `{ success, ... }` envelope
/// is stripped before the caller sees it, and `success: false` becomes
/// [`Error::Gateway`] with the server message verbatim.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the operator session lives in a cookie). `base_url`
    /// is the gateway root (e.g. `http://192.168.88.2:5000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    /// Build a full URL for an admin path: `{base}/admin/{path}`
    pub(crate) fn admin_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/admin/{path}");
        Url::parse(&full).expect("invalid admin URL")
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Establish an operator session.
    ///
    /// `POST /admin/login` with form-encoded credentials. The gateway
    /// redirects to the dashboard on success and re-renders the login page
    /// (HTTP 200) on bad credentials; with redirect-following disabled the
    /// two are distinguishable by status alone.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.admin_url("login");
        debug!(%username, "operator login");

        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password.expose_secret())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_redirection() {
            return Ok(());
        }
        if status == reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                message: "invalid operator credentials".into(),
            });
        }
        Err(Error::Gateway {
            message: format!("unexpected login response: HTTP {status}"),
        })
    }

    /// Drop the operator session on the gateway side.
    ///
    /// Best-effort: the session cookie expires on its own, so callers may
    /// ignore failures here.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.admin_url("logout");
        debug!("operator logout");
        self.http.get(url).send().await.map_err(Error::Transport)?;
        Ok(())
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the current session list.
    ///
    /// `GET /api/users`
    pub async fn list_sessions(&self) -> Result<Vec<ActiveSession>, Error> {
        let url = self.api_url("users");
        debug!("listing active sessions");

        let envelope: SessionListResponse = self.get_json(url).await?;
        if envelope.success {
            Ok(envelope.users)
        } else {
            Err(Error::Gateway {
                message: envelope
                    .error
                    .or(envelope.message)
                    .unwrap_or_else(|| "gateway reported failure without detail".into()),
            })
        }
    }

    /// Disconnect a session by its id.
    ///
    /// `POST /api/disconnect_user` with form-encoded `user_id`. Returns the
    /// server's confirmation message when it provides one.
    pub async fn disconnect_session(&self, session_id: &str) -> Result<Option<String>, Error> {
        let url = self.api_url("disconnect_user");
        debug!(session_id, "disconnecting session");

        let resp = self
            .http
            .post(url)
            .form(&[("user_id", session_id)])
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: StatusResponse = Self::parse_envelope(resp).await?;
        if envelope.success {
            Ok(envelope.message)
        } else {
            Err(Error::Gateway {
                message: envelope.failure_message(),
            })
        }
    }

    /// Trigger a refresh of the external credential mirror.
    ///
    /// `GET /api/refresh_sheet` -- fire-and-report, not part of the
    /// session polling loop.
    pub async fn refresh_sheet(&self) -> Result<SheetRefresh, Error> {
        let url = self.api_url("refresh_sheet");
        debug!("refreshing credential mirror");

        let envelope: StatusResponse = self.get_json(url).await?;
        if envelope.success {
            Ok(SheetRefresh {
                rows: envelope.rows,
                message: envelope.message,
            })
        } else {
            Err(Error::Gateway {
                message: envelope.failure_message(),
            })
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the JSON envelope.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_envelope(resp).await
    }

    /// Parse a response body as JSON, translating auth-shaped statuses
    /// first.
    ///
    /// The gateway answers unauthenticated API calls with a redirect to the
    /// login page, and wraps application failures as JSON with a non-2xx
    /// status in some error paths -- those bodies are still parsed so the
    /// server message survives.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status.is_redirection() {
            return Err(Error::SessionExpired);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => {
                let preview = &body[..body.len().min(200)];
                Err(Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                })
            }
            Err(_) => {
                // Non-2xx with an unparseable body: report the HTTP failure.
                let preview = &body[..body.len().min(200)];
                Err(Error::Gateway {
                    message: format!("HTTP {status}: {preview}"),
                })
            }
        }
    }
}
