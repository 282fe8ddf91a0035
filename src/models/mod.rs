//! Request and Response models for the expiration server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ExpireAtRequest, ExpireRequest, SetRequest};
pub use responses::{
    ExpireResponse, GetResponse, HealthResponse, MessageResponse, StatsResponse, TtlResponse,
};
