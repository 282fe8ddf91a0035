//! Adaptive Eviction Task
//!
//! Background task that retires due keys and re-arms itself at an interval
//! derived from the nearest remaining deadline. Sleeping for half the
//! remaining distance converges on the deadline without overshooting it;
//! `min_interval` and `max_interval` bound the tick rate on either side.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, trace};

use crate::config::SchedulerConfig;
use crate::expire::{clock, Deadline, Key, SharedExpirationStore};

/// Host hook invoked once for every expired key.
///
/// Runs on the eviction task after the store lock has been released, so it
/// must not block for long. Deleting the value is the host's business; the
/// key is retired from the index either way.
pub type EvictionCallback = Arc<dyn Fn(Key) + Send + Sync>;

// == Scheduler State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending; sleeping for `max_interval`
    Idle,
    /// Sleeping for an interval derived from the nearest deadline
    Armed,
    /// Popping due keys under the store's write lock
    Draining,
}

// == Interval Computation ==
/// Decides how long to sleep after a tick.
///
/// `horizon` is the look-ahead adjusted time of the tick, as a duration since
/// the Unix epoch.
pub fn compute_next_wakeup(
    next_deadline: Option<Deadline>,
    horizon: Duration,
    config: &SchedulerConfig,
) -> (Duration, SchedulerState) {
    match next_deadline {
        None => (config.max_interval, SchedulerState::Idle),
        Some(deadline) => {
            let remaining = Duration::from_millis(deadline).saturating_sub(horizon);
            let raw = remaining.min(config.max_interval);
            ((raw / 2).max(config.min_interval), SchedulerState::Armed)
        }
    }
}

// == Eviction Task Handle ==
/// Handle to a running eviction task.
///
/// Dropping the handle also stops the task.
#[derive(Debug)]
pub struct EvictionTask {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SchedulerState>,
}

impl EvictionTask {
    /// Signals the task to stop after its current tick.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Current scheduler state.
    pub fn state(&self) -> SchedulerState {
        *self.state_rx.borrow()
    }

    /// Returns a receiver that observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state_rx.clone()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to exit.
    pub async fn join(self) -> Result<(), JoinError> {
        let Self {
            handle,
            shutdown_tx,
            state_rx: _,
        } = self;
        let result = handle.await;
        drop(shutdown_tx);
        result
    }
}

fn transition(state_tx: &watch::Sender<SchedulerState>, next: SchedulerState) {
    let previous = state_tx.send_replace(next);
    if previous != next {
        trace!(?previous, ?next, "Eviction scheduler state change");
    }
}

/// Runs one tick: drains everything due and computes the next sleep.
async fn run_tick(
    store: &SharedExpirationStore,
    config: &SchedulerConfig,
    state_tx: &watch::Sender<SchedulerState>,
) -> (Duration, Vec<Key>) {
    let mut guard = store.write().await;

    let horizon = clock::now() + config.lookahead;
    let horizon_ms = horizon.as_millis() as Deadline;

    let mut expired = Vec::new();
    if guard
        .peek_next_deadline()
        .is_some_and(|deadline| deadline <= horizon_ms)
    {
        transition(state_tx, SchedulerState::Draining);
        expired = guard.pop_due(horizon_ms);
    }

    let next_deadline = guard.peek_next_deadline();
    drop(guard);

    let (interval, state) = compute_next_wakeup(next_deadline, horizon, config);
    transition(state_tx, state);
    (interval, expired)
}

/// Spawns the adaptive eviction task.
///
/// The task ticks immediately, then sleeps for the computed interval between
/// ticks. Each tick holds the store's write lock only while draining due keys;
/// `on_evict` is called for each of them, in deadline order, once the lock is
/// released.
///
/// # Example
/// ```ignore
/// let store = rtexp::expire::shared(ExpirationStore::new());
/// let task = spawn_eviction_task(store.clone(), SchedulerConfig::default(), Arc::new(|key| {
///     println!("expired {:?}", key);
/// }));
/// // Later, during shutdown:
/// task.shutdown();
/// ```
pub fn spawn_eviction_task(
    store: SharedExpirationStore,
    config: SchedulerConfig,
    on_evict: EvictionCallback,
) -> EvictionTask {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);

    let handle = tokio::spawn(async move {
        info!(
            "Starting eviction task (min_interval={:?}, max_interval={:?}, lookahead={:?})",
            config.min_interval, config.max_interval, config.lookahead
        );

        loop {
            let (interval, expired) = run_tick(&store, &config, &state_tx).await;

            if !expired.is_empty() {
                debug!(count = expired.len(), "Eviction: expired keys");
            }
            for key in expired {
                on_evict(key);
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Eviction task stopped");
    });

    EvictionTask {
        handle,
        shutdown_tx,
        state_rx,
    }
}
