//! Entity Cache Module
//!
//! Read-through cache for the full entity collection, kept in step with the
//! persistent store on every write.
//!
//! The collection lives in a single cache slot keyed by [`ENTITY_CACHE_KEY`].
//! Every read-modify-replace of that slot, and the store write preceding it,
//! runs under one acquisition of the slot's mutex so concurrent writers
//! cannot overwrite each other's changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, EntryOptions};
use crate::db::EntityStore;
use crate::error::{Result, ServiceError};
use crate::models::{Entity, NewEntity};

/// Cache key holding the entity collection: the entity type's name.
pub const ENTITY_CACHE_KEY: &str = "Entity";

/// Default sliding expiration for the collection.
pub const DEFAULT_SLIDING_EXPIRATION: Duration = Duration::from_secs(30);

type Slot = CacheStore<Vec<Entity>>;

// == Delete Outcome ==
/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entity was removed from the store and the cache.
    Deleted,
    /// Id 0 was given; nothing was touched.
    Skipped,
}

// == Entity Cache ==
/// Owns the cached entity collection and its lifecycle.
pub struct EntityCache {
    store: Arc<dyn EntityStore>,
    slot: Mutex<Slot>,
    options: EntryOptions,
    loads: AtomicU64,
}

impl std::fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl EntityCache {
    /// Creates a cache over `store` with the given sliding expiration.
    pub fn new(store: Arc<dyn EntityStore>, sliding_expiration: Duration) -> Self {
        Self {
            store,
            slot: Mutex::new(CacheStore::new()),
            options: EntryOptions::sliding(sliding_expiration),
            loads: AtomicU64::new(0),
        }
    }

    /// Creates a cache with the default 30 second sliding expiration.
    pub fn with_defaults(store: Arc<dyn EntityStore>) -> Self {
        Self::new(store, DEFAULT_SLIDING_EXPIRATION)
    }

    // == Ensure Populated ==
    /// Returns the cached collection, fetching it from the store on a miss.
    ///
    /// A hit renews the sliding window. A failed store read propagates and
    /// leaves the slot empty.
    pub async fn ensure_populated(&self) -> Result<Vec<Entity>> {
        let mut slot = self.slot.lock().await;
        self.populate(&mut slot).await
    }

    // == Insert ==
    /// Persists a new entity, then appends it to the cached collection.
    pub async fn insert(&self, entity: NewEntity) -> Result<Entity> {
        let mut slot = self.slot.lock().await;
        let entity = self.store.insert(entity).await?;
        self.sync_insert(&mut slot, &entity).await?;
        info!(id = entity.id, "Entity created");
        Ok(entity)
    }

    // == Update ==
    /// Persists new values for an existing entity, then replaces it in the
    /// cached collection at the same position.
    ///
    /// If the store has no such entity, any stale cached copy is dropped and
    /// [`ServiceError::NotFound`] is returned.
    pub async fn update(&self, entity: Entity) -> Result<Entity> {
        let mut slot = self.slot.lock().await;
        match self.store.update(&entity).await.map_err(ServiceError::from) {
            Ok(()) => {}
            Err(ServiceError::NotFound(id)) => {
                self.evict_stale(&mut slot, id);
                return Err(ServiceError::NotFound(id));
            }
            Err(err) => return Err(err),
        }
        self.sync_update(&mut slot, &entity).await?;
        info!(id = entity.id, "Entity updated");
        Ok(entity)
    }

    // == Delete ==
    /// Deletes an entity from the store, then removes it from the cached
    /// collection.
    ///
    /// Id 0 is the invalid sentinel and returns [`DeleteOutcome::Skipped`]
    /// without touching the cache or the store. If the store no longer has
    /// the entity, any stale cached copy is dropped and
    /// [`ServiceError::NotFound`] is returned.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        if id == 0 {
            debug!("Delete with id 0 skipped");
            return Ok(DeleteOutcome::Skipped);
        }

        let mut slot = self.slot.lock().await;
        let Some(entity) = self.store.fetch_by_id(id).await? else {
            self.evict_stale(&mut slot, id);
            return Err(ServiceError::NotFound(id));
        };
        self.store.delete(&entity).await?;

        let mut items = self.populate(&mut slot).await?;
        if let Some(index) = items.iter().position(|e| e.id == id) {
            items.remove(index);
            self.replace(&mut slot, items);
        }
        info!(id = id, "Entity deleted");
        Ok(DeleteOutcome::Deleted)
    }

    // == Synchronize On Insert ==
    /// Appends an already-persisted entity to the cached collection.
    pub async fn synchronize_on_insert(&self, entity: &Entity) -> Result<()> {
        let mut slot = self.slot.lock().await;
        self.sync_insert(&mut slot, entity).await
    }

    // == Synchronize On Update ==
    /// Replaces the cached element with `entity.id` in place.
    ///
    /// Returns false, leaving the collection untouched, when no cached
    /// element has that id.
    pub async fn synchronize_on_update(&self, entity: &Entity) -> Result<bool> {
        let mut slot = self.slot.lock().await;
        self.sync_update(&mut slot, entity).await
    }

    // == Maintenance ==
    /// Drops the collection if its sliding window has elapsed.
    pub async fn purge_expired(&self) -> usize {
        self.slot.lock().await.cleanup_expired()
    }

    /// Whether a live collection is cached. Does not renew the window.
    pub async fn is_populated(&self) -> bool {
        self.slot.lock().await.contains(ENTITY_CACHE_KEY)
    }

    pub async fn stats(&self) -> CacheStats {
        let mut stats = self.slot.lock().await.stats();
        stats.store_loads = self.loads.load(Ordering::Relaxed);
        stats
    }

    // == Internals ==
    // Each helper expects the caller to hold the slot lock for the whole
    // read-modify-replace sequence.

    async fn populate(&self, slot: &mut MutexGuard<'_, Slot>) -> Result<Vec<Entity>> {
        if let Some(items) = slot.try_get(ENTITY_CACHE_KEY) {
            debug!(count = items.len(), "Entity cache hit");
            return Ok(items.clone());
        }

        let items = self.store.fetch_all().await?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        debug!(count = items.len(), "Entity cache populated from store");
        slot.set(ENTITY_CACHE_KEY, items.clone(), self.options);
        Ok(items)
    }

    async fn sync_insert(&self, slot: &mut MutexGuard<'_, Slot>, entity: &Entity) -> Result<()> {
        let mut items = self.populate(slot).await?;
        // A cold slot was just filled from the store and already holds it
        if items.iter().any(|e| e.id == entity.id) {
            return Ok(());
        }
        items.push(entity.clone());
        self.replace(slot, items);
        Ok(())
    }

    async fn sync_update(&self, slot: &mut MutexGuard<'_, Slot>, entity: &Entity) -> Result<bool> {
        let mut items = self.populate(slot).await?;
        let Some(index) = items.iter().position(|e| e.id == entity.id) else {
            debug!(id = entity.id, "Updated entity not cached, collection unchanged");
            return Ok(false);
        };
        items[index] = entity.clone();
        self.replace(slot, items);
        Ok(true)
    }

    /// Removes a cached element the store no longer has, without populating.
    fn evict_stale(&self, slot: &mut MutexGuard<'_, Slot>, id: i64) {
        let Some(items) = slot.try_get(ENTITY_CACHE_KEY) else {
            return;
        };
        if items.iter().all(|e| e.id != id) {
            return;
        }
        warn!(id = id, "Dropping cached entity missing from store");
        let items: Vec<Entity> = items.iter().filter(|e| e.id != id).cloned().collect();
        self.replace(slot, items);
    }

    fn replace(&self, slot: &mut MutexGuard<'_, Slot>, items: Vec<Entity>) {
        slot.set(ENTITY_CACHE_KEY, items, self.options);
    }
}
