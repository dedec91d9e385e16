//! Cache Entry Module
//!
//! Defines individual cache entries with sliding-expiration support.

use std::time::{Duration, Instant};

// == Entry Options ==
/// Per-entry expiration policy supplied to [`CacheStore::set`](super::CacheStore::set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// Idle window after which the entry expires; renewed on every access.
    /// None = never expires
    pub sliding_expiration: Option<Duration>,
}

impl EntryOptions {
    /// Options with a sliding expiration window.
    pub fn sliding(window: Duration) -> Self {
        Self {
            sliding_expiration: Some(window),
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Last time the entry was stored or read
    pub last_accessed: Instant,
    /// Sliding expiration window, None = no expiration
    pub sliding_expiration: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with the given expiration options.
    pub fn new(value: V, options: EntryOptions) -> Self {
        Self {
            value,
            last_accessed: Instant::now(),
            sliding_expiration: options.sliding_expiration,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once a full window has elapsed since the last
    /// access (elapsed >= window).
    pub fn is_expired(&self) -> bool {
        match self.sliding_expiration {
            Some(window) => self.last_accessed.elapsed() >= window,
            None => false,
        }
    }

    // == Touch ==
    /// Renews the sliding window.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}
