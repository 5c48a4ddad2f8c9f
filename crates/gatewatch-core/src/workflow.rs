// ── Disconnect confirmation state machine ──
//
// Terminating a session is the one destructive action in the dashboard,
// so it is gated behind an explicit confirm step. The flow holds at most
// one pending target; selecting a new target overwrites the old one, and
// confirmation always reads the value current at confirm time -- never a
// copy captured when the prompt was opened.

use crate::model::SessionId;

/// An operator's in-progress intent to terminate a specific session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDisconnect {
    pub target_id: SessionId,
    /// Identity shown in the confirmation prompt.
    pub target_label: String,
}

/// Confirm-then-commit flow for session termination.
///
/// States: idle (no pending target) -> selected (prompt visible) ->
/// confirmed (target handed to the caller for execution) -> idle.
/// Cancellation returns to idle without a backend call.
#[derive(Debug, Default)]
pub struct DisconnectFlow {
    pending: Option<PendingDisconnect>,
}

impl DisconnectFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a disconnect target, opening the confirmation prompt.
    /// A prior unconfirmed selection is overwritten -- last selection wins.
    pub fn select(&mut self, target_id: SessionId, target_label: impl Into<String>) {
        self.pending = Some(PendingDisconnect {
            target_id,
            target_label: target_label.into(),
        });
    }

    /// The selection awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&PendingDisconnect> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Operator confirmed: hand over the current target and return to idle.
    /// Returns `None` when nothing was pending (stray confirm keypress).
    pub fn confirm(&mut self) -> Option<PendingDisconnect> {
        self.pending.take()
    }

    /// Operator dismissed the prompt: drop the selection, no backend call.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn confirm_without_selection_is_a_no_op() {
        let mut flow = DisconnectFlow::new();
        assert!(!flow.is_pending());
        assert!(flow.confirm().is_none());
    }

    #[test]
    fn confirm_acts_on_the_current_target_and_clears_it() {
        let mut flow = DisconnectFlow::new();
        flow.select(SessionId::from("*1A"), "5551230001");

        let confirmed = flow.confirm().unwrap();
        assert_eq!(confirmed.target_id, SessionId::from("*1A"));
        assert_eq!(confirmed.target_label, "5551230001");
        assert!(!flow.is_pending());
    }

    #[test]
    fn last_selection_wins() {
        let mut flow = DisconnectFlow::new();
        flow.select(SessionId::from("*1A"), "alice");
        flow.select(SessionId::from("*2B"), "bob");

        // Confirming must operate on B, never A.
        let confirmed = flow.confirm().unwrap();
        assert_eq!(confirmed.target_id, SessionId::from("*2B"));
        assert_eq!(confirmed.target_label, "bob");
    }

    #[test]
    fn cancel_clears_without_executing() {
        let mut flow = DisconnectFlow::new();
        flow.select(SessionId::from("*1A"), "alice");
        flow.cancel();

        assert!(!flow.is_pending());
        assert!(flow.confirm().is_none());
    }
}
