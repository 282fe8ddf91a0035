//! Response DTOs for the expiration server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::expire::{Deadline, ExpirationStats};

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Generic acknowledgement for PUT /set, DELETE /del/:key and
/// DELETE /expire/:key
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
    /// The key that was acted on
    pub key: String,
}

impl MessageResponse {
    pub fn new(key: impl Into<String>, action: &str) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' {} successfully", key, action),
            key,
        }
    }
}

/// Response body for POST /expire/:key and POST /expireat/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub key: String,
    /// Absolute deadline (Unix milliseconds)
    pub deadline_ms: Deadline,
    /// Registration generation for this key
    pub generation: u64,
}

/// Response body for GET /ttl/:key
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    /// Milliseconds until expiry
    pub ttl_ms: u64,
    /// Absolute deadline (Unix milliseconds)
    pub deadline_ms: Deadline,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Expiration store counters
    #[serde(flatten)]
    pub expirations: ExpirationStats,
    /// Fraction of queued events that are tombstones
    pub stale_ratio: f64,
    /// Values currently held by the keyspace
    pub keyspace_entries: usize,
    /// Values removed from the keyspace by eviction
    pub keyspace_evicted: u64,
}

impl StatsResponse {
    pub fn new(expirations: ExpirationStats, keyspace_entries: usize, keyspace_evicted: u64) -> Self {
        Self {
            stale_ratio: expirations.stale_ratio(),
            expirations,
            keyspace_entries,
            keyspace_evicted,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", "test_value");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("test_key"));
        assert!(json.contains("test_value"));
    }

    #[test]
    fn test_message_response_serialize() {
        let resp = MessageResponse::new("my_key", "set");
        assert_eq!(resp.message, "Key 'my_key' set successfully");
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = ExpirationStats::new();
        stats.record_registered();
        stats.set_sizes(1, 2);

        let resp = StatsResponse::new(stats, 3, 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["registered"], 1);
        assert_eq!(json["pending"], 1);
        assert_eq!(json["queued"], 2);
        assert_eq!(json["stale_ratio"], 0.5);
        assert_eq!(json["keyspace_entries"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
