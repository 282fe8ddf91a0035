//! API Module
//!
//! HTTP glue mapping expiration commands onto the store.
//!
//! # Endpoints
//! - `PUT /set`, `GET /get/:key`, `DELETE /del/:key` - values
//! - `POST /expire/:key`, `POST /expireat/:key`, `DELETE /expire/:key`, `GET /ttl/:key` - expirations
//! - `GET /stats`, `GET /health` - diagnostics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
