//! Expiration Store Module
//!
//! Composes the index and the queue into the public expiration operations.
//! Queue entries are never removed by key; instead each entry carries the
//! generation it was queued with and is discarded lazily once the index no
//! longer agrees with it.

use std::thread::sleep;
use std::time::Duration;

use crate::error::Result;
use crate::expire::clock::{current_timestamp_ms, deadline_after};
use crate::expire::{
    Deadline, ExpirationIndex, ExpirationStats, ExpiryQueue, Key, QueuedEvent,
};

// == Expiration Store ==
/// Deadline-ordered expiration index with lazy tombstone invalidation.
///
/// Not internally synchronized; share it behind a lock (see
/// [`SharedExpirationStore`](crate::expire::SharedExpirationStore)).
#[derive(Debug, Default)]
pub struct ExpirationStore {
    /// Authoritative key -> (deadline, generation) map
    index: ExpirationIndex,
    /// Candidate events, possibly stale
    queue: ExpiryQueue,
    /// Diagnostic counters
    stats: ExpirationStats,
}

impl ExpirationStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            index: ExpirationIndex::new(),
            queue: ExpiryQueue::new(),
            stats: ExpirationStats::new(),
        }
    }

    // == Set Expiration ==
    /// Schedules `key` to expire `ttl_ms` milliseconds from now.
    ///
    /// Returns the generation assigned to this registration.
    pub fn set_expiration(&mut self, key: &[u8], ttl_ms: u64) -> Result<u64> {
        self.set_expiration_at(key, deadline_after(ttl_ms))
    }

    // == Set Expiration At ==
    /// Schedules `key` to expire at the absolute `deadline`.
    ///
    /// Any previously queued event for the key becomes stale. The event is
    /// queued before the index is committed, so an `InsertFailed` leaves the
    /// store exactly as it was.
    pub fn set_expiration_at(&mut self, key: &[u8], deadline: Deadline) -> Result<u64> {
        let handle = self
            .index
            .key_handle(key)
            .unwrap_or_else(|| Key::from(key));
        let generation = self.index.next_generation(key);

        let seq = self.queue.offer(handle.clone(), deadline, generation)?;

        let committed = self.index.put(handle, deadline, seq);
        debug_assert_eq!(committed, generation);

        self.stats.record_registered();
        Ok(generation)
    }

    // == Get Expiration ==
    /// Returns the deadline registered for `key`.
    pub fn get_expiration(&self, key: &[u8]) -> Option<Deadline> {
        self.index.get(key).map(|(deadline, _)| deadline)
    }

    // == TTL Remaining ==
    /// Milliseconds left until `key` expires, saturating at zero.
    pub fn ttl_remaining(&self, key: &[u8]) -> Option<u64> {
        self.get_expiration(key)
            .map(|deadline| deadline.saturating_sub(current_timestamp_ms()))
    }

    // == Clear Expiration ==
    /// Removes the expiration for `key`. Queued events are reaped lazily.
    pub fn clear_expiration(&mut self, key: &[u8]) -> bool {
        let removed = self.index.remove(key);
        if removed {
            self.stats.record_cleared();
        }
        removed
    }

    // == Liveness ==
    /// An event is live while the index record points at it.
    ///
    /// Generations restart at 0 after a clear, so the queue sequence number
    /// is what ties a record to exactly one event.
    fn is_live(&self, event: &QueuedEvent) -> bool {
        self.index.get_record(&event.key).is_some_and(|record| {
            record.generation == event.generation && record.seq == event.seq
        })
    }

    /// Number of queued events for `key` that would still fire.
    #[cfg(test)]
    pub(crate) fn live_event_count(&self, key: &[u8]) -> usize {
        self.queue
            .iter()
            .filter(|event| &*event.key == key && self.is_live(event))
            .count()
    }

    #[cfg(test)]
    pub(crate) fn fail_next_queue_insert(&mut self) {
        self.queue.fail_next_offer();
    }

    /// Drops stale events from the head of the queue and returns the
    /// deadline of the first live one.
    fn sweep_stale(&mut self) -> Option<Deadline> {
        loop {
            let head = self.queue.peek_head()?;
            if self.is_live(head) {
                return Some(head.deadline);
            }
            self.queue.poll_head();
            self.stats.record_stale_reaped();
        }
    }

    // == Peek Next Deadline ==
    /// Returns the smallest live deadline without retiring it.
    pub fn peek_next_deadline(&mut self) -> Option<Deadline> {
        self.sweep_stale()
    }

    // == Pop Next ==
    /// Retires the live key with the smallest deadline, regardless of
    /// whether that deadline has passed.
    ///
    /// This is the only operation that fires an expiration.
    pub fn pop_next(&mut self) -> Option<Key> {
        self.sweep_stale()?;
        let event = self.queue.poll_head()?;
        self.index.remove(&event.key);
        self.stats.record_expired();
        Some(event.key)
    }

    // == Pop Due ==
    /// Retires every live key whose deadline is at or before `horizon`,
    /// in deadline order.
    pub fn pop_due(&mut self, horizon: Deadline) -> Vec<Key> {
        let mut due = Vec::new();
        while let Some(deadline) = self.peek_next_deadline() {
            if deadline > horizon {
                break;
            }
            match self.pop_next() {
                Some(key) => due.push(key),
                None => break,
            }
        }
        due
    }

    // == Pop Next Blocking ==
    /// Sleeps until the next deadline, then pops it.
    ///
    /// Single-threaded helper: it races with a running eviction task and
    /// cannot be cancelled.
    pub fn pop_next_blocking(&mut self) -> Option<Key> {
        let deadline = self.peek_next_deadline()?;
        let wait = deadline.saturating_sub(current_timestamp_ms());
        if wait > 0 {
            sleep(Duration::from_millis(wait));
        }
        self.pop_next()
    }

    // == Pending Count ==
    /// Number of keys currently holding a deadline.
    pub fn pending_count(&self) -> usize {
        self.index.count()
    }

    // == Queued Length ==
    /// Number of queued events, stale ones included.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    // == Stats ==
    /// Returns current expiration statistics.
    pub fn stats(&self) -> ExpirationStats {
        let mut stats = self.stats.clone();
        stats.set_sizes(self.index.count(), self.queue.len());
        stats
    }
}
