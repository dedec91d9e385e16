//! Response DTOs for the entity API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::time::Duration;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::entity::Entity;

/// Response body for GET /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// Time spent serving the collection, as `hh:mm:ss.fffffff`
    pub time: String,
    /// The cached collection
    pub data: Vec<Entity>,
}

impl ListResponse {
    /// Creates a new ListResponse
    pub fn new(elapsed: Duration, data: Vec<Entity>) -> Self {
        Self {
            time: format_elapsed(elapsed),
            data,
        }
    }
}

/// Formats a duration as `hh:mm:ss.fffffff` (100ns ticks in the fraction).
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let ticks = elapsed.subsec_nanos() / 100;
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ticks
    )
}

/// Response body for the stats endpoint (GET /api/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries dropped after their sliding window elapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Times the collection was loaded from the store
    pub store_loads: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Store loads per lookup
    pub load_ratio: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            store_loads: stats.store_loads,
            hit_rate: stats.hit_rate(),
            load_ratio: stats.load_ratio(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
