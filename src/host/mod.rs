//! Host Module
//!
//! The bundled host datastore that eviction callbacks delete from.

mod entry;
mod keyspace;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::HostEntry;
pub use keyspace::{validate_key, Keyspace};

/// Keyspace handle shared between handlers and the reaper task.
pub type SharedKeyspace = Arc<RwLock<Keyspace>>;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Delay between an index deadline and the keyspace's own fallback expiry
pub const FALLBACK_BUFFER_MS: u64 = 5;
