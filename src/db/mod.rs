//! Persistent Store Module
//!
//! The source of truth behind the entity cache: an async CRUD interface over
//! a single relational table, with a SQLite backend. An in-process double is
//! available to tests and behind the `test-utils` feature.

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Entity, NewEntity};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

// == Store Error ==
/// Failures reported by an [`EntityStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite rejected or failed the statement
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Update or delete targeted a row that does not exist
    #[error("No entity with id {0}")]
    NotFound(i64),

    /// The store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The blocking task running the statement panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Entity Store ==
/// Async CRUD access to the persisted entities.
///
/// `fetch_all` returns entities ordered by id. `update` and `delete` report
/// [`StoreError::NotFound`] when no row matches.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Read-only fetch of the full collection.
    async fn fetch_all(&self) -> StoreResult<Vec<Entity>>;

    /// Fetch a single entity by id.
    async fn fetch_by_id(&self, id: i64) -> StoreResult<Option<Entity>>;

    /// Persist a new entity and return it with its assigned id.
    async fn insert(&self, entity: NewEntity) -> StoreResult<Entity>;

    /// Overwrite the stored values of an existing entity.
    async fn update(&self, entity: &Entity) -> StoreResult<()>;

    /// Remove an existing entity.
    async fn delete(&self, entity: &Entity) -> StoreResult<()>;
}
