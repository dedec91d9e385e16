//! Cache Module
//!
//! Provides the in-memory sliding-expiration cache and the entity cache
//! built on it.

mod entry;
mod manager;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, EntryOptions};
pub use manager::{DeleteOutcome, EntityCache, DEFAULT_SLIDING_EXPIRATION, ENTITY_CACHE_KEY};
pub use stats::CacheStats;
pub use store::CacheStore;
