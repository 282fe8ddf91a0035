//! API Routes
//!
//! Configures the Axum router with all expiration server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, expire_at_handler, expire_handler, get_handler, health_handler,
    persist_handler, set_handler, stats_handler, ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value, optionally with `ttl_ms`
/// - `GET /get/:key` - Retrieve a value
/// - `DELETE /del/:key` - Delete a value and its expiration
/// - `POST /expire/:key` - Expire a key after `ttl_ms`
/// - `DELETE /expire/:key` - Remove a key's expiration
/// - `POST /expireat/:key` - Expire a key at `timestamp_ms`
/// - `GET /ttl/:key` - Remaining time to live
/// - `GET /stats` - Expiration statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/expire/:key", post(expire_handler).delete(persist_handler))
        .route("/expireat/:key", post(expire_at_handler))
        .route("/ttl/:key", get(ttl_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
