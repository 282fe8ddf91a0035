//! Request DTOs for the expiration server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::host::{validate_key, MAX_VALUE_SIZE};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The key to store the value under
/// - `value`: The value to store
/// - `ttl_ms`: Optional expiration in milliseconds; without it the key
///   is persistent and any previous expiration is removed
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Err(e) = validate_key(&self.key) {
            return Some(e.to_string());
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

/// Request body for POST /expire/:key
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireRequest {
    /// Time to live in milliseconds
    pub ttl_ms: u64,
}

/// Request body for POST /expireat/:key
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireAtRequest {
    /// Absolute Unix timestamp in milliseconds
    pub timestamp_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
        assert!(req.ttl_ms.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl_ms": 1500}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl_ms, Some(1500));
    }

    #[test]
    fn test_expire_requests_deserialize() {
        let req: ExpireRequest = serde_json::from_str(r#"{"ttl_ms": 250}"#).unwrap();
        assert_eq!(req.ttl_ms, 250);

        let req: ExpireAtRequest =
            serde_json::from_str(r#"{"timestamp_ms": 1700000000000}"#).unwrap();
        assert_eq!(req.timestamp_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let result: Result<ExpireRequest, _> = serde_json::from_str(r#"{"ttl_ms": -5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: "test".to_string(),
            ttl_ms: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: "test".to_string(),
            ttl_ms: Some(60),
        };
        assert!(req.validate().is_none());
    }
}
