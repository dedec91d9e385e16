//! API Handlers
//!
//! HTTP request handlers for each endpoint. Validation happens here, before
//! the cache or the store is touched.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::cache::{DeleteOutcome, EntityCache};
use crate::config::Config;
use crate::db::{EntityStore, SqliteStore, StoreResult};
use crate::error::{Result, ServiceError};
use crate::models::{
    DeleteQuery, Entity, EntityRequest, HealthResponse, ListResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entity cache in front of the persistent store
    pub entities: Arc<EntityCache>,
}

impl AppState {
    /// Creates a new AppState around the given entity cache.
    pub fn new(entities: EntityCache) -> Self {
        Self {
            entities: Arc::new(entities),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the SQLite store at the configured path and fronts it with a
    /// cache using the configured sliding expiration.
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let store: Arc<dyn EntityStore> = Arc::new(SqliteStore::open(&config.database_path)?);
        Ok(Self::new(EntityCache::new(store, config.sliding_expiration())))
    }
}

/// Maps body extraction failures (bad JSON, wrong types) to a 400.
fn parse_body(
    payload: std::result::Result<Json<EntityRequest>, JsonRejection>,
) -> Result<EntityRequest> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))
}

/// Maps query string failures (non-numeric id) to a 400.
fn parse_query(
    query: std::result::Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<DeleteQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))
}

/// Handler for GET /api/cache
///
/// Returns the cached collection and the time taken to produce it.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let started = Instant::now();
    let data = state.entities.ensure_populated().await?;
    Ok(Json(ListResponse::new(started.elapsed(), data)))
}

/// Handler for POST /api/cache
pub async fn create_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EntityRequest>, JsonRejection>,
) -> Result<Json<Entity>> {
    let new_entity = parse_body(payload)?.into_new_entity()?;
    let created = state.entities.insert(new_entity).await?;
    Ok(Json(created))
}

/// Handler for PUT /api/cache
pub async fn update_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EntityRequest>, JsonRejection>,
) -> Result<Json<Entity>> {
    let entity = parse_body(payload)?.into_entity()?;
    let updated = state.entities.update(entity).await?;
    Ok(Json(updated))
}

/// Handler for DELETE /api/cache?id={id}
///
/// Responds 204 for the id 0 sentinel, 200 once the entity is gone.
pub async fn delete_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<StatusCode> {
    let query = parse_query(query)?;
    match state.entities.delete(query.id).await? {
        DeleteOutcome::Deleted => Ok(StatusCode::OK),
        DeleteOutcome::Skipped => Ok(StatusCode::NO_CONTENT),
    }
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.entities.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
