//! Expiry Queue Module
//!
//! Deadline-ordered min-heap of candidate expiration events. The queue knows
//! nothing about liveness; stale events are filtered by the store.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Result, StoreError};
use crate::expire::{Deadline, Key};

// == Queued Event ==
/// Snapshot of a key's registration taken when it was queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEvent {
    pub key: Key,
    pub deadline: Deadline,
    pub generation: u64,
    /// Assigned by the queue, unique for its lifetime
    pub seq: u64,
}

/// Heap slot ordered by `(deadline, seq)`, smallest first.
#[derive(Debug)]
struct Slot(QueuedEvent);

impl Slot {
    fn sort_key(&self) -> (Deadline, u64) {
        (self.0.deadline, self.0.seq)
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Slot {}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    // BinaryHeap is a max-heap, so the comparison is reversed
    fn cmp(&self, other: &Self) -> Ordering {
        other.sort_key().cmp(&self.sort_key())
    }
}

// == Expiry Queue ==
/// Min-ordered priority queue of [`QueuedEvent`]s.
///
/// Equal deadlines are served in insertion order.
#[derive(Debug, Default)]
pub struct ExpiryQueue {
    heap: BinaryHeap<Slot>,
    next_seq: u64,
    #[cfg(test)]
    fail_next_offer: bool,
}

impl ExpiryQueue {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Offer ==
    /// Queues an event for `key` and returns the sequence number it was
    /// stamped with.
    ///
    /// Capacity is reserved up front, so a failed allocation is reported as
    /// [`StoreError::InsertFailed`] and leaves the queue untouched.
    pub fn offer(&mut self, key: Key, deadline: Deadline, generation: u64) -> Result<u64> {
        self.reserve_slot()?;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Slot(QueuedEvent {
            key,
            deadline,
            generation,
            seq,
        }));
        Ok(seq)
    }

    fn reserve_slot(&mut self) -> Result<()> {
        #[cfg(test)]
        let refused = std::mem::take(&mut self.fail_next_offer);
        #[cfg(not(test))]
        let refused = false;
        if refused {
            return Err(StoreError::InsertFailed(
                "expiry queue allocation failed: injected".to_string(),
            ));
        }

        self.heap.try_reserve(1).map_err(|e| {
            StoreError::InsertFailed(format!("expiry queue allocation failed: {}", e))
        })
    }

    /// Makes the next `offer` fail as if the allocation had been refused.
    #[cfg(test)]
    pub(crate) fn fail_next_offer(&mut self) {
        self.fail_next_offer = true;
    }

    /// Queued events in no particular order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &QueuedEvent> {
        self.heap.iter().map(|slot| &slot.0)
    }

    // == Peek Head ==
    /// Returns the event with the smallest deadline without removing it.
    pub fn peek_head(&self) -> Option<&QueuedEvent> {
        self.heap.peek().map(|slot| &slot.0)
    }

    // == Poll Head ==
    /// Removes and returns the event with the smallest deadline.
    pub fn poll_head(&mut self) -> Option<QueuedEvent> {
        self.heap.pop().map(|slot| slot.0)
    }

    // == Length ==
    /// Number of queued events, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
