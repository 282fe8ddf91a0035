//! API Handlers
//!
//! HTTP request handlers mapping expiration commands onto the store.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{Result, StoreError};
use crate::expire::clock::deadline_after;
use crate::expire::{shared, Deadline, ExpirationStore, SharedExpirationStore};
use crate::host::{validate_key, Keyspace, SharedKeyspace};
use crate::models::{
    ExpireAtRequest, ExpireRequest, ExpireResponse, GetResponse, HealthResponse,
    MessageResponse, SetRequest, StatsResponse, TtlResponse,
};

/// Application state shared across all handlers.
///
/// Locks are always taken one at a time, never nested.
#[derive(Clone)]
pub struct AppState {
    /// Expiration index shared with the eviction task
    pub expirations: SharedExpirationStore,
    /// Host values shared with the reaper task
    pub keyspace: SharedKeyspace,
}

impl AppState {
    pub fn new(expirations: ExpirationStore, keyspace: Keyspace) -> Self {
        Self {
            expirations: shared(expirations),
            keyspace: Arc::new(RwLock::new(keyspace)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExpirationStore::new(), Keyspace::new())
    }
}

/// Registers `deadline` for `key` and arms the keyspace fallback.
async fn register_deadline(
    state: &AppState,
    key: &str,
    deadline: Deadline,
) -> Result<ExpireResponse> {
    validate_key(key)?;

    let generation = state
        .expirations
        .write()
        .await
        .set_expiration_at(key.as_bytes(), deadline)?;
    state.keyspace.write().await.set_fallback(key, Some(deadline));

    Ok(ExpireResponse {
        key: key.to_string(),
        deadline_ms: deadline,
        generation,
    })
}

/// Handler for PUT /set
///
/// Stores a value, optionally with an expiration (SETEX semantics).
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(StoreError::InvalidRequest(error_msg));
    }

    state
        .keyspace
        .write()
        .await
        .set(req.key.clone(), req.value)?;

    match req.ttl_ms {
        Some(ttl_ms) => {
            register_deadline(&state, &req.key, deadline_after(ttl_ms)).await?;
        }
        None => {
            state
                .expirations
                .write()
                .await
                .clear_expiration(req.key.as_bytes());
        }
    }

    Ok(Json(MessageResponse::new(req.key, "set")))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: expired entries are removed on read
    let value = state.keyspace.write().await.get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes the value and any expiration registered for it.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.keyspace.write().await.delete(&key)?;
    state
        .expirations
        .write()
        .await
        .clear_expiration(key.as_bytes());

    Ok(Json(MessageResponse::new(key, "deleted")))
}

/// Handler for POST /expire/:key
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExpireRequest>,
) -> Result<Json<ExpireResponse>> {
    let response = register_deadline(&state, &key, deadline_after(req.ttl_ms)).await?;
    Ok(Json(response))
}

/// Handler for POST /expireat/:key
///
/// A timestamp in the past is accepted and fires on the next eviction tick.
pub async fn expire_at_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExpireAtRequest>,
) -> Result<Json<ExpireResponse>> {
    let response = register_deadline(&state, &key, req.timestamp_ms).await?;
    Ok(Json(response))
}

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let store = state.expirations.read().await;
    match (
        store.get_expiration(key.as_bytes()),
        store.ttl_remaining(key.as_bytes()),
    ) {
        (Some(deadline_ms), Some(ttl_ms)) => Ok(Json(TtlResponse {
            key,
            ttl_ms,
            deadline_ms,
        })),
        _ => Err(StoreError::NotFound(key)),
    }
}

/// Handler for DELETE /expire/:key
///
/// Removes the expiration but keeps the value.
pub async fn persist_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    let cleared = state
        .expirations
        .write()
        .await
        .clear_expiration(key.as_bytes());
    if !cleared {
        return Err(StoreError::NotFound(key));
    }
    state.keyspace.write().await.set_fallback(&key, None);

    Ok(Json(MessageResponse::new(key, "persisted")))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let expirations = state.expirations.read().await.stats();
    let (entries, evicted) = {
        let keyspace = state.keyspace.read().await;
        (keyspace.len(), keyspace.evicted())
    };

    Json(StatsResponse::new(expirations, entries, evicted))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_request(key: &str, ttl_ms: Option<u64>) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: "value".to_string(),
            ttl_ms,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = AppState::default();

        let result = set_handler(State(state.clone()), Json(set_request("k", None))).await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("k".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "value");
    }

    #[tokio::test]
    async fn test_set_with_ttl_registers_expiration() {
        let state = AppState::default();

        set_handler(State(state.clone()), Json(set_request("k", Some(60_000))))
            .await
            .unwrap();

        let ttl = ttl_handler(State(state.clone()), Path("k".to_string()))
            .await
            .unwrap();
        assert!(ttl.ttl_ms <= 60_000 && ttl.ttl_ms >= 59_000);
    }

    #[tokio::test]
    async fn test_plain_set_clears_expiration() {
        let state = AppState::default();

        set_handler(State(state.clone()), Json(set_request("k", Some(60_000))))
            .await
            .unwrap();
        set_handler(State(state.clone()), Json(set_request("k", None)))
            .await
            .unwrap();

        let ttl = ttl_handler(State(state.clone()), Path("k".to_string())).await;
        assert!(matches!(ttl, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expire_bumps_generation() {
        let state = AppState::default();

        let first = expire_handler(
            State(state.clone()),
            Path("k".to_string()),
            Json(ExpireRequest { ttl_ms: 100 }),
        )
        .await
        .unwrap();
        let second = expire_handler(
            State(state.clone()),
            Path("k".to_string()),
            Json(ExpireRequest { ttl_ms: 5_000 }),
        )
        .await
        .unwrap();

        assert_eq!(first.generation, 0);
        assert_eq!(second.generation, 1);
        assert_eq!(state.expirations.read().await.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_expire_at_handler() {
        let state = AppState::default();

        let response = expire_at_handler(
            State(state.clone()),
            Path("k".to_string()),
            Json(ExpireAtRequest {
                timestamp_ms: 4_102_444_800_000,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.deadline_ms, 4_102_444_800_000);
        assert_eq!(
            state.expirations.read().await.get_expiration(b"k"),
            Some(4_102_444_800_000)
        );
    }

    #[tokio::test]
    async fn test_persist_handler() {
        let state = AppState::default();
        set_handler(State(state.clone()), Json(set_request("k", Some(60_000))))
            .await
            .unwrap();

        assert!(persist_handler(State(state.clone()), Path("k".to_string()))
            .await
            .is_ok());
        let again = persist_handler(State(state.clone()), Path("k".to_string())).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));

        // Value survives
        assert!(get_handler(State(state), Path("k".to_string())).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_handler_clears_expiration() {
        let state = AppState::default();
        set_handler(State(state.clone()), Json(set_request("k", Some(60_000))))
            .await
            .unwrap();

        delete_handler(State(state.clone()), Path("k".to_string()))
            .await
            .unwrap();

        assert_eq!(state.expirations.read().await.pending_count(), 0);
        assert!(get_handler(State(state), Path("k".to_string())).await.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::default();
        set_handler(State(state.clone()), Json(set_request("k", Some(60_000))))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.expirations.registered, 1);
        assert_eq!(response.expirations.pending, 1);
        assert_eq!(response.keyspace_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = AppState::default();

        let result = set_handler(State(state), Json(set_request("", None))).await;
        assert!(matches!(result, Err(StoreError::InvalidRequest(_))));
    }

    /// Fires `key` through the store, then re-sets it before the reaper
    /// gets to run, and returns the value left in the keyspace.
    async fn reset_between_fire_and_reap(ttl_ms: Option<u64>) -> Result<String> {
        use crate::expire::clock::current_timestamp_ms;
        use crate::tasks::{eviction_channel, spawn_keyspace_reaper};

        let state = AppState::default();
        set_handler(State(state.clone()), Json(set_request("k", Some(0))))
            .await
            .unwrap();

        let (on_evict, evicted_rx) = eviction_channel();
        let due = state
            .expirations
            .write()
            .await
            .pop_due(current_timestamp_ms());
        assert_eq!(due.len(), 1);
        for key in due {
            on_evict(key);
        }

        let fresh = SetRequest {
            key: "k".to_string(),
            value: "fresh".to_string(),
            ttl_ms,
        };
        set_handler(State(state.clone()), Json(fresh)).await.unwrap();

        let reaper = spawn_keyspace_reaper(state.keyspace.clone(), evicted_rx);
        drop(on_evict);
        reaper.await.unwrap();

        let value = state.keyspace.write().await.get("k");
        value
    }

    #[tokio::test]
    async fn test_reaper_keeps_value_set_after_fire() {
        let value = reset_between_fire_and_reap(None).await;
        assert_eq!(value.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_reaper_keeps_value_reset_with_ttl() {
        let value = reset_between_fire_and_reap(Some(60_000)).await;
        assert_eq!(value.unwrap(), "fresh");
    }
}
