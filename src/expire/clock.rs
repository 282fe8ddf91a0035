//! Wall-clock helpers
//!
//! Deadlines are absolute Unix timestamps in milliseconds.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Absolute expiration timestamp (Unix milliseconds).
pub type Deadline = u64;

/// Returns the time elapsed since the Unix epoch.
///
/// Clamps to zero if the system clock reports a time before the epoch.
pub fn now() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> Deadline {
    now().as_millis() as Deadline
}

/// Computes the deadline `ttl_ms` milliseconds from now.
pub fn deadline_after(ttl_ms: u64) -> Deadline {
    current_timestamp_ms().saturating_add(ttl_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_matches_duration() {
        let before = now().as_millis() as u64;
        let ts = current_timestamp_ms();
        let after = now().as_millis() as u64;
        assert!(before <= ts && ts <= after);
    }

    #[test]
    fn test_deadline_after_saturates() {
        assert_eq!(deadline_after(u64::MAX), u64::MAX);
    }
}
