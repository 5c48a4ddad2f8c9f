// Wire types for the gateway admin API.
//
// The gateway is a thin shim over the router's hotspot table, so field
// hygiene is loose: byte counters arrive as JSON numbers or decimal
// strings depending on the router firmware, and may be missing entirely.
// Absent, null, or unparseable counters deserialize to 0.

use serde::{Deserialize, Deserializer};

/// One connected client session as reported by the gateway.
///
/// `uptime` is a router-formatted duration string ("4h32m10s"); it is
/// displayed verbatim and never re-parsed locally.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSession {
    pub id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default, deserialize_with = "de_byte_count")]
    pub bytes_in: u64,
    #[serde(default, deserialize_with = "de_byte_count")]
    pub bytes_out: u64,
}

/// Result of triggering a refresh of the external credential mirror.
#[derive(Debug, Clone)]
pub struct SheetRefresh {
    /// Row count reported by the gateway, when it provides one.
    pub rows: Option<u64>,
    pub message: Option<String>,
}

// ── Response envelopes ──────────────────────────────────────────────

/// Envelope for the session-list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionListResponse {
    pub success: bool,
    #[serde(default)]
    pub users: Vec<ActiveSession>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Envelope for endpoints that return only a status.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub success: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    pub rows: Option<u64>,
}

impl StatusResponse {
    /// The failure text the operator should see: `error` wins, `message`
    /// is the fallback.
    pub(crate) fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "gateway reported failure without detail".into())
    }
}

// ── Byte counter deserialization ────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

fn de_byte_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCount::Number(n)) => n,
        Some(RawCount::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn counters_accept_numbers_and_strings() {
        let json = r#"{
            "id": "*1", "user": "5551234", "address": "10.5.50.20",
            "mac_address": "AA:BB:CC:DD:EE:FF", "uptime": "1h2m",
            "bytes_in": 1048576, "bytes_out": "524288"
        }"#;
        let s: ActiveSession = serde_json::from_str(json).unwrap();
        assert_eq!(s.bytes_in, 1_048_576);
        assert_eq!(s.bytes_out, 524_288);
    }

    #[test]
    fn missing_null_and_garbage_counters_are_zero() {
        let json = r#"{ "id": "*2", "user": "x", "bytes_in": null, "bytes_out": "n/a" }"#;
        let s: ActiveSession = serde_json::from_str(json).unwrap();
        assert_eq!(s.bytes_in, 0);
        assert_eq!(s.bytes_out, 0);
        assert_eq!(s.uptime, "");
    }
}
