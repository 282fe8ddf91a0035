//! Keyspace Reaper Task
//!
//! Deletes values from the host keyspace as the eviction task reports their
//! keys. The eviction callback only enqueues; deletion happens here, so the
//! expiration store's lock is never held while touching the keyspace.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::expire::Key;
use crate::host::SharedKeyspace;
use crate::tasks::EvictionCallback;

/// Creates an eviction callback that forwards keys to the returned receiver.
pub fn eviction_channel() -> (EvictionCallback, mpsc::UnboundedReceiver<Key>) {
    let (tx, rx) = mpsc::unbounded_channel::<Key>();
    let callback: EvictionCallback = Arc::new(move |key| {
        if tx.send(key).is_err() {
            warn!("Keyspace reaper is gone; dropping evicted key");
        }
    });
    (callback, rx)
}

/// Spawns a task that removes every received key from the keyspace.
///
/// The task ends once all senders (eviction callbacks) are dropped.
pub fn spawn_keyspace_reaper(
    keyspace: SharedKeyspace,
    mut evicted: mpsc::UnboundedReceiver<Key>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(key) = evicted.recv().await {
            let removed = keyspace.write().await.evict(&key);
            if removed {
                debug!(key = %String::from_utf8_lossy(&key), "Reaper: evicted key");
            } else {
                debug!(key = %String::from_utf8_lossy(&key), "Reaper: key absent or re-set, skipped");
            }
        }
        debug!("Keyspace reaper stopped");
    })
}
