//! Keyspace Module
//!
//! Minimal host datastore holding the values whose expirations the index
//! tracks. Keys are removed when the eviction task reports them.

use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::expire::clock::current_timestamp_ms;
use crate::expire::Deadline;
use crate::host::{HostEntry, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Keyspace ==
#[derive(Debug, Default)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, HostEntry>,
    /// Number of keys removed by eviction
    evicted: u64,
}

/// Validates a key against the keyspace limits.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

impl Keyspace {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            evicted: 0,
        }
    }

    // == Set ==
    /// Stores a value. Overwriting drops any fallback expiry.
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.entries.insert(key, HostEntry::new(value));
        Ok(())
    }

    // == Set Fallback ==
    /// Arms (or with `None`, disarms) the fallback expiry for a key whose
    /// index deadline is `deadline`. Returns false if the key is absent.
    pub fn set_fallback(&mut self, key: &str, deadline: Option<Deadline>) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = deadline;
                true
            }
            None => false,
        }
    }

    // == Get ==
    /// Retrieves a value by key. Entries past their fallback expiry are removed.
    pub fn get(&mut self, key: &str) -> Result<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                Err(StoreError::Expired(key.to_string()))
            }
            Some(entry) => Ok(entry.value.clone()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    // == Delete ==
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound(key.to_string()))
        }
    }

    // == Evict ==
    /// Removes a key reported by the eviction task, if its value is still
    /// the one that was due.
    ///
    /// Reports arrive after the expiration lock is released, so the key may
    /// have been re-set in between. Such a value is left alone (see
    /// [`HostEntry::is_evictable`]). Keys that are not valid UTF-8 cannot be
    /// present and are ignored.
    pub fn evict(&mut self, key: &[u8]) -> bool {
        self.evict_at(key, current_timestamp_ms())
    }

    fn evict_at(&mut self, key: &[u8], now: u64) -> bool {
        let Ok(key) = std::str::from_utf8(key) else {
            return false;
        };
        let due = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_evictable(now));
        if !due {
            return false;
        }

        self.entries.remove(key);
        self.evicted += 1;
        true
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the keyspace holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
