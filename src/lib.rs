//! rtexp - Real-time key expiration index
//!
//! Tracks per-key deadlines and retires keys in strict deadline order through
//! an adaptive eviction task, independently of the datastore holding the values.

pub mod api;
pub mod config;
pub mod error;
pub mod expire;
pub mod host;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, SchedulerConfig};
pub use error::StoreError;
pub use expire::{ExpirationStore, Key, SharedExpirationStore};
pub use tasks::{spawn_eviction_task, EvictionCallback, EvictionTask, SchedulerState};
