//! API Module
//!
//! HTTP handlers and routing for the entity REST API.
//!
//! # Endpoints
//! - `GET /api/cache` - List entities (read-through the cache)
//! - `POST /api/cache` - Create an entity
//! - `PUT /api/cache` - Update an entity
//! - `DELETE /api/cache?id={id}` - Delete an entity
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
