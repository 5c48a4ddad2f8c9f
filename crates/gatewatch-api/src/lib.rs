//! Async client for the captive-portal gateway's admin API.
//!
//! The gateway exposes a small JSON surface behind an operator session:
//! a session-list endpoint, a disconnect endpoint, and a trigger for
//! refreshing the external credential mirror. Every response is wrapped
//! in a `{ "success": bool, ... }` envelope; [`GatewayClient`] strips the
//! envelope and turns `success: false` into [`Error::Gateway`] carrying
//! the server's message verbatim.
//!
//! The client never follows redirects — the gateway answers unauthenticated
//! API calls with a redirect to its login page, which this crate reports as
//! [`Error::SessionExpired`] instead of silently parsing HTML.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use models::{ActiveSession, SheetRefresh};
pub use transport::{TlsMode, TransportConfig};
