//! Expiration Statistics Module
//!
//! Diagnostic counters for the expiration store.

use serde::Serialize;

// == Expiration Stats ==
/// Tracks registration, expiry and tombstone activity.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ExpirationStats {
    /// Number of successful `set_expiration` calls
    pub registered: u64,
    /// Number of `clear_expiration` calls that removed a record
    pub cleared: u64,
    /// Number of keys retired by `pop_next`
    pub expired: u64,
    /// Number of stale queue entries discarded by the lazy sweep
    pub stale_reaped: u64,
    /// Keys currently holding a deadline
    pub pending: usize,
    /// Queue entries currently held, stale ones included
    pub queued: usize,
}

impl ExpirationStats {
    // == Constructor ==
    /// Creates a new ExpirationStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Stale Ratio ==
    /// Fraction of queued entries that are tombstones.
    ///
    /// Returns 0.0 when the queue is empty.
    pub fn stale_ratio(&self) -> f64 {
        if self.queued == 0 {
            0.0
        } else {
            self.queued.saturating_sub(self.pending) as f64 / self.queued as f64
        }
    }

    pub fn record_registered(&mut self) {
        self.registered += 1;
    }

    pub fn record_cleared(&mut self) {
        self.cleared += 1;
    }

    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    pub fn record_stale_reaped(&mut self) {
        self.stale_reaped += 1;
    }

    // == Update Snapshots ==
    /// Updates the pending and queued gauges.
    pub fn set_sizes(&mut self, pending: usize, queued: usize) {
        self.pending = pending;
        self.queued = queued;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = ExpirationStats::new();
        assert_eq!(stats.registered, 0);
        assert_eq!(stats.cleared, 0);
        assert_eq!(stats.expired, 0);
        assert_eq!(stats.stale_reaped, 0);
    }

    #[test]
    fn test_stale_ratio_empty() {
        let stats = ExpirationStats::new();
        assert_eq!(stats.stale_ratio(), 0.0);
    }

    #[test]
    fn test_stale_ratio_mixed() {
        let mut stats = ExpirationStats::new();
        stats.set_sizes(1, 4);
        assert_eq!(stats.stale_ratio(), 0.75);
    }

    #[test]
    fn test_counters() {
        let mut stats = ExpirationStats::new();
        stats.record_registered();
        stats.record_registered();
        stats.record_cleared();
        stats.record_expired();
        stats.record_stale_reaped();

        assert_eq!(stats.registered, 2);
        assert_eq!(stats.cleared, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.stale_reaped, 1);
    }
}
