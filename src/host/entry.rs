//! Host Entry Module
//!
//! A stored value plus the host-side fallback expiry.

use crate::expire::clock::current_timestamp_ms;
use crate::expire::Deadline;
use crate::host::FALLBACK_BUFFER_MS;

// == Host Entry ==
/// Represents a single value held by the host keyspace.
#[derive(Debug, Clone)]
pub struct HostEntry {
    /// The stored value
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Index deadline this value was registered with, None = no expiration
    pub expires_at: Option<Deadline>,
}

impl HostEntry {
    // == Constructor ==
    /// Creates a new entry without expiry.
    pub fn new(value: String) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            expires_at: None,
        }
    }

    // == Fallback Expiry ==
    /// Set slightly after the index deadline so the value disappears even
    /// if the eviction callback never reaches it.
    pub fn fallback_expires_at(&self) -> Option<Deadline> {
        self.expires_at
            .map(|deadline| deadline.saturating_add(FALLBACK_BUFFER_MS))
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its fallback expiry.
    pub fn is_expired(&self) -> bool {
        match self.fallback_expires_at() {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Is Evictable ==
    /// Whether an eviction reported at `now` may remove this entry.
    ///
    /// The entry must still carry a deadline, and that deadline must be no
    /// further than the fallback buffer ahead of `now`. A value re-set after
    /// its key fired has no deadline or a later one, and survives.
    pub fn is_evictable(&self, now: u64) -> bool {
        self.expires_at
            .is_some_and(|deadline| deadline <= now.saturating_add(FALLBACK_BUFFER_MS))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry_expiring_at(deadline: Deadline) -> HostEntry {
        HostEntry {
            value: "test".to_string(),
            created_at: current_timestamp_ms(),
            expires_at: Some(deadline),
        }
    }

    #[test]
    fn test_entry_creation_no_expiry() {
        let entry = HostEntry::new("test_value".to_string());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(entry.fallback_expires_at().is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = entry_expiring_at(now - FALLBACK_BUFFER_MS);

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_fallback_lags_deadline() {
        let now = current_timestamp_ms();
        let entry = entry_expiring_at(now + 60_000);

        assert_eq!(entry.fallback_expires_at(), Some(now + 60_000 + FALLBACK_BUFFER_MS));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_evictable_only_near_deadline() {
        let now = 10_000;

        assert!(entry_expiring_at(now - 1).is_evictable(now));
        assert!(entry_expiring_at(now + FALLBACK_BUFFER_MS).is_evictable(now));
        assert!(!entry_expiring_at(now + FALLBACK_BUFFER_MS + 1).is_evictable(now));
        assert!(!HostEntry::new("no deadline".to_string()).is_evictable(now));
    }
}
