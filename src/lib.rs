//! Entity Cache - CRUD over a single entity with a read-through cache
//!
//! Serves the full entity collection from a process-local, sliding-expiration
//! cache and keeps that cache in step with the SQLite store on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
