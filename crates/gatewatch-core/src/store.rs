// ── Reactive session storage ──
//
// The dataset is one small table that the gateway re-reports in full on
// every poll, so storage is a whole-snapshot watch channel rather than a
// keyed collection: apply_snapshot replaces everything and recomputes the
// derived aggregates in the same step, so subscribers can never observe a
// session list and stats that disagree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{AggregateStats, Session, SessionId, aggregate};

/// Reactive store for the last known session snapshot.
///
/// Subscribers get push-based change notification through `watch`
/// channels; readers take cheap `Arc` snapshots.
pub struct SessionStore {
    sessions: watch::Sender<Arc<Vec<Arc<Session>>>>,
    stats: watch::Sender<AggregateStats>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (sessions, _) = watch::channel(Arc::new(Vec::new()));
        let (stats, _) = watch::channel(AggregateStats::default());
        let (last_refresh, _) = watch::channel(None);
        Self {
            sessions,
            stats,
            last_refresh,
        }
    }

    /// Replace the entire working set with a fresh poll result.
    ///
    /// Sessions absent from the incoming snapshot simply disappear -- the
    /// gateway surfaces no tombstones for disconnected clients.
    pub(crate) fn apply_snapshot(&self, incoming: Vec<Session>) {
        let snapshot: Vec<Arc<Session>> = incoming.into_iter().map(Arc::new).collect();
        let stats = aggregate(&snapshot);

        // `send_modify` updates unconditionally, even with zero receivers.
        self.sessions.send_modify(|s| *s = Arc::new(snapshot));
        self.stats.send_modify(|s| *s = stats);
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    /// Get the current session snapshot (cheap `Arc` clone).
    pub fn sessions_snapshot(&self) -> Arc<Vec<Arc<Session>>> {
        self.sessions.borrow().clone()
    }

    /// Subscribe to session snapshot changes.
    pub fn subscribe_sessions(&self) -> watch::Receiver<Arc<Vec<Arc<Session>>>> {
        self.sessions.subscribe()
    }

    /// Current aggregate statistics.
    pub fn stats(&self) -> AggregateStats {
        *self.stats.borrow()
    }

    /// Subscribe to aggregate statistic changes.
    pub fn subscribe_stats(&self) -> watch::Receiver<AggregateStats> {
        self.stats.subscribe()
    }

    /// When the last successful poll was applied.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// Look up a session by id in the current snapshot.
    pub fn session_by_id(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions
            .borrow()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(id: &str, bytes_in: u64, bytes_out: u64) -> Session {
        Session {
            id: SessionId::from(id),
            user: format!("555{id}"),
            address: "10.5.50.20".into(),
            mac_address: "AA:BB:CC:DD:EE:FF".into(),
            uptime: "10m".into(),
            bytes_in,
            bytes_out,
        }
    }

    #[test]
    fn snapshot_starts_empty_with_zero_stats() {
        let store = SessionStore::new();
        assert!(store.sessions_snapshot().is_empty());
        assert_eq!(store.stats(), AggregateStats::default());
        assert!(store.last_refresh().is_none());
    }

    #[test]
    fn apply_snapshot_replaces_the_working_set() {
        let store = SessionStore::new();
        store.apply_snapshot(vec![session("1", 100, 50), session("2", 10, 5)]);
        assert_eq!(store.session_count(), 2);

        // Session "1" disconnected; only "3" remains alongside "2".
        store.apply_snapshot(vec![session("2", 20, 10), session("3", 1, 1)]);
        assert_eq!(store.session_count(), 2);
        assert!(store.session_by_id(&SessionId::from("1")).is_none());
        assert!(store.session_by_id(&SessionId::from("3")).is_some());
    }

    #[test]
    fn stats_are_recomputed_with_every_snapshot() {
        let store = SessionStore::new();
        store.apply_snapshot(vec![session("1", 1_048_576, 524_288), session("2", 1_048_576, 524_288)]);

        let stats = store.stats();
        assert_eq!(stats.connected_count, 2);
        assert_eq!(stats.total_bytes_in, 2_097_152);
        assert_eq!(stats.total_bytes_out, 1_048_576);

        store.apply_snapshot(Vec::new());
        assert_eq!(store.stats(), AggregateStats::default());
    }

    #[test]
    fn subscribers_see_the_new_snapshot() {
        let store = SessionStore::new();
        let mut rx = store.subscribe_sessions();

        store.apply_snapshot(vec![session("1", 0, 0)]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
