//! Entity model and the request/response DTOs for the HTTP API
//!
//! This module defines the persisted record and the types used for
//! serializing/deserializing HTTP request and response bodies.

pub mod entity;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entity::{Entity, NewEntity, MAX_NAME_LENGTH};
pub use requests::{DeleteQuery, EntityRequest};
pub use responses::{ErrorResponse, HealthResponse, ListResponse, StatsResponse};
