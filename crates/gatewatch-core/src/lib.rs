//! Reactive data layer between `gatewatch-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic and domain model for the gatewatch
//! workspace:
//!
//! - **[`Controller`]** — Central facade managing the full lifecycle:
//!   [`connect()`](Controller::connect) establishes the operator session,
//!   fetches an initial session snapshot, then spawns background tasks for
//!   periodic polling and command processing.
//!   [`Controller::oneshot()`](Controller::oneshot) provides a lightweight
//!   fire-and-forget mode for single CLI invocations.
//!
//! - **[`SessionStore`]** — Reactive storage built on `tokio::sync::watch`
//!   channels. Each poll replaces the entire working set; the derived
//!   [`AggregateStats`] are recomputed alongside every snapshot.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the controller's command loop. Reads bypass the channel
//!   via direct store snapshots.
//!
//! - **[`DisconnectFlow`]** — The confirm-then-commit state machine gating
//!   session termination. At most one pending target; last selection wins;
//!   the confirm step always acts on the current target.
//!
//! - **[`login`]** — The guest portal form validator, a small peripheral
//!   independent of the dashboard loop.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod login;
pub mod model;
pub mod store;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{AdminCredentials, GatewayConfig, TlsVerification};
pub use controller::{ConnectionState, Controller, Notice, NoticeLevel};
pub use error::CoreError;
pub use model::{AggregateStats, Session, SessionId, aggregate};
pub use store::SessionStore;
pub use workflow::{DisconnectFlow, PendingDisconnect};
