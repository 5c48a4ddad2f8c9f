//! All possible UI actions. Actions are the sole mechanism for state
//! mutation in the dashboard loop.

use std::sync::Arc;

use gatewatch_core::{AggregateStats, Notice, Session, SessionId};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data events (from the controller's streams) ────────────────
    SessionsUpdated(Arc<Vec<Arc<Session>>>),
    StatsUpdated(AggregateStats),
    BusyChanged(bool),

    // ── Connection status ──────────────────────────────────────────
    Connected,
    Disconnected(String),

    // ── Operator requests ──────────────────────────────────────────
    /// Manual session refresh (`r`).
    RequestRefresh,
    /// Trigger the credential-mirror refresh (`s`).
    RequestSheetRefresh,
    /// Open the disconnect confirmation for a table row (`d`).
    RequestDisconnect { id: SessionId, label: String },

    // ── Confirm dialog ─────────────────────────────────────────────
    ConfirmYes,
    ConfirmNo,

    // ── Help ───────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notice),
}
