//! Expire Module
//!
//! Real-time expiration index: a hash-backed index of per-key deadlines paired
//! with a deadline-ordered queue of candidate events, reconciled lazily via
//! per-key generation stamps.

pub mod clock;
mod index;
mod queue;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::Deadline;
pub use index::{ExpirationIndex, ExpirationRecord};
pub use queue::{ExpiryQueue, QueuedEvent};
pub use stats::ExpirationStats;
pub use store::ExpirationStore;

/// Opaque key bytes. The index owns the canonical handle; queued events
/// share it.
pub type Key = Arc<[u8]>;

/// Store handle shared between command handlers and the eviction task.
pub type SharedExpirationStore = Arc<RwLock<ExpirationStore>>;

/// Wraps a store for sharing with the eviction task.
pub fn shared(store: ExpirationStore) -> SharedExpirationStore {
    Arc::new(RwLock::new(store))
}
