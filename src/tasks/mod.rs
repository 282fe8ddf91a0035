//! Background Tasks Module
//!
//! Contains the background tasks that run for the lifetime of the server.
//!
//! # Tasks
//! - Eviction: retires due keys from the expiration store at adaptive intervals
//! - Reaper: deletes evicted keys from the host keyspace

mod eviction;
mod reaper;

pub use eviction::{
    compute_next_wakeup, spawn_eviction_task, EvictionCallback, EvictionTask, SchedulerState,
};
pub use reaper::{eviction_channel, spawn_keyspace_reaper};
