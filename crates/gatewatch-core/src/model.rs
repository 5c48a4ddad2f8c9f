// ── Session domain types ──
//
// A Session is an immutable snapshot of one connected client as the
// gateway reported it. The core never mutates a session; every poll
// replaces the whole working set.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque session identifier, stable across polls while the client stays
/// connected. Assigned by the router; no structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One connected client session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    /// Identity the client logged in with (a mobile number on this gateway).
    pub user: String,
    pub address: String,
    pub mac_address: String,
    /// Router-formatted duration string, displayed verbatim.
    pub uptime: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Session {
    /// Human-facing label for confirmation prompts and notices.
    pub fn display_label(&self) -> &str {
        if self.user.is_empty() {
            self.id.as_str()
        } else {
            &self.user
        }
    }
}

impl From<gatewatch_api::ActiveSession> for Session {
    fn from(wire: gatewatch_api::ActiveSession) -> Self {
        Self {
            id: SessionId::new(wire.id),
            user: wire.user,
            address: wire.address,
            mac_address: wire.mac_address,
            uptime: wire.uptime,
            bytes_in: wire.bytes_in,
            bytes_out: wire.bytes_out,
        }
    }
}

// ── Aggregates ──────────────────────────────────────────────────────

/// Derived summary statistics, recomputed from scratch on every poll and
/// never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub connected_count: usize,
    pub total_bytes_in: u64,
    pub total_bytes_out: u64,
}

/// Compute aggregate statistics over a session snapshot.
///
/// Pure, single pass. An empty snapshot yields all zeros; sums saturate
/// rather than wrap.
pub fn aggregate(sessions: &[Arc<Session>]) -> AggregateStats {
    sessions.iter().fold(
        AggregateStats {
            connected_count: sessions.len(),
            ..AggregateStats::default()
        },
        |mut acc, s| {
            acc.total_bytes_in = acc.total_bytes_in.saturating_add(s.bytes_in);
            acc.total_bytes_out = acc.total_bytes_out.saturating_add(s.bytes_out);
            acc
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(id: &str, bytes_in: u64, bytes_out: u64) -> Arc<Session> {
        Arc::new(Session {
            id: SessionId::from(id),
            user: format!("555{id}"),
            address: "10.5.50.20".into(),
            mac_address: "AA:BB:CC:DD:EE:FF".into(),
            uptime: "1h2m3s".into(),
            bytes_in,
            bytes_out,
        })
    }

    #[test]
    fn aggregate_empty_is_all_zeros() {
        let stats = aggregate(&[]);
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn aggregate_counts_and_sums() {
        let sessions = vec![
            session("1", 1_048_576, 524_288),
            session("2", 1_048_576, 524_288),
        ];
        let stats = aggregate(&sessions);
        assert_eq!(stats.connected_count, 2);
        assert_eq!(stats.total_bytes_in, 2_097_152);
        assert_eq!(stats.total_bytes_out, 1_048_576);
    }

    #[test]
    fn aggregate_is_pure_and_idempotent() {
        let sessions = vec![session("1", 10, 20), session("2", 0, 0)];
        assert_eq!(aggregate(&sessions), aggregate(&sessions));
    }

    #[test]
    fn aggregate_saturates_instead_of_wrapping() {
        let sessions = vec![session("1", u64::MAX, u64::MAX), session("2", 1, 1)];
        let stats = aggregate(&sessions);
        assert_eq!(stats.total_bytes_in, u64::MAX);
        assert_eq!(stats.total_bytes_out, u64::MAX);
    }

    #[test]
    fn display_label_falls_back_to_id() {
        let mut s = (*session("9", 0, 0)).clone();
        assert_eq!(s.display_label(), "5559");
        s.user.clear();
        assert_eq!(s.display_label(), "9");
    }
}
