//! Expiration Index Module
//!
//! Authoritative mapping from key to its current deadline and generation stamp.

use std::collections::HashMap;

use crate::expire::{Deadline, Key};

// == Expiration Record ==
/// The single source of truth for when a key is scheduled to expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationRecord {
    /// Canonical copy of the key
    pub key: Key,
    /// Absolute deadline (Unix milliseconds)
    pub deadline: Deadline,
    /// Bumped on every re-registration of the key
    pub generation: u64,
    /// Queue sequence number of the event that carries this registration
    pub seq: u64,
}

// == Expiration Index ==
/// Hash-backed index with at most one record per key.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    records: HashMap<Key, ExpirationRecord>,
}

impl ExpirationIndex {
    // == Constructor ==
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    // == Put ==
    /// Registers `deadline` for `key` and returns the record's generation.
    ///
    /// A new key starts at generation 0. An existing key keeps its canonical
    /// key handle, gets the new deadline and has its generation incremented.
    /// `seq` identifies the queued event that now represents the key.
    pub fn put(&mut self, key: Key, deadline: Deadline, seq: u64) -> u64 {
        match self.records.get_mut(&key) {
            Some(record) => {
                record.generation += 1;
                record.deadline = deadline;
                record.seq = seq;
                record.generation
            }
            None => {
                self.records.insert(
                    key.clone(),
                    ExpirationRecord {
                        key,
                        deadline,
                        generation: 0,
                        seq,
                    },
                );
                0
            }
        }
    }

    // == Next Generation ==
    /// Returns the generation the next `put` for `key` will assign.
    pub fn next_generation(&self, key: &[u8]) -> u64 {
        self.records
            .get(key)
            .map(|record| record.generation + 1)
            .unwrap_or(0)
    }

    // == Key Handle ==
    /// Returns the canonical shared handle for `key`, if registered.
    pub fn key_handle(&self, key: &[u8]) -> Option<Key> {
        self.records.get(key).map(|record| record.key.clone())
    }

    // == Get ==
    /// Point lookup returning `(deadline, generation)`.
    pub fn get(&self, key: &[u8]) -> Option<(Deadline, u64)> {
        self.records
            .get(key)
            .map(|record| (record.deadline, record.generation))
    }

    // == Get Record ==
    /// Full record for `key`, including the sequence number of its live event.
    pub fn get_record(&self, key: &[u8]) -> Option<&ExpirationRecord> {
        self.records.get(key)
    }

    // == Remove ==
    /// Deletes the record for `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.records.remove(key).is_some()
    }

    // == Count ==
    /// Number of distinct registered keys.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no key holds a deadline.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
