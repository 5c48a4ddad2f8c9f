// ── Command API ──
//
// All write operations flow through a unified `Command` enum routed to
// the controller's command loop. Reads bypass the channel via direct
// `SessionStore` snapshots.

use crate::error::CoreError;
use crate::model::SessionId;

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against the gateway.
#[derive(Debug, Clone)]
pub enum Command {
    /// Terminate a client session. On success the controller performs
    /// exactly one session refresh; on failure it performs none.
    DisconnectSession { id: SessionId },

    /// Trigger a refresh of the external credential mirror.
    /// Fire-and-report; does not touch the session snapshot.
    RefreshSheet,
}

/// Result of a command execution.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Session terminated. `label` is the display identity of the target;
    /// `message` is the gateway's own confirmation text when it sent one.
    Disconnected {
        label: String,
        message: Option<String>,
    },
    /// Credential mirror refreshed, with the mirrored row count when the
    /// gateway reports it.
    SheetRefreshed {
        rows: Option<u64>,
        message: Option<String>,
    },
}
