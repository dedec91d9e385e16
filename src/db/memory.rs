//! In-process entity store.
//!
//! Keeps entities in a vector and counts full-collection fetches, which makes
//! cache population observable. Can be switched into a failing mode to
//! exercise store error paths.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::{Entity, NewEntity};

/// Entity store held entirely in memory.
#[derive(Debug)]
pub struct MemoryStore {
    entities: RwLock<Vec<Entity>>,
    next_id: AtomicI64,
    fetch_all_calls: AtomicU64,
    calls: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fetch_all_calls: AtomicU64::new(0),
            calls: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Creates a store seeded with `names`, assigned ids 1..=n.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut entities = store.entities.write();
            for name in names {
                let id = store.next_id.fetch_add(1, Ordering::SeqCst);
                entities.push(Entity::new(id, name));
            }
        }
        store
    }

    /// Number of `fetch_all` calls served so far.
    pub fn fetch_all_calls(&self) -> u64 {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    /// Number of store calls of any kind.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current contents, bypassing counters.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.read().clone()
    }

    /// Removes an entity behind the cache's back.
    pub fn remove_directly(&self, id: i64) {
        self.entities.write().retain(|e| e.id != id);
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn fetch_all(&self) -> StoreResult<Vec<Entity>> {
        self.enter()?;
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entities.read().clone())
    }

    async fn fetch_by_id(&self, id: i64) -> StoreResult<Option<Entity>> {
        self.enter()?;
        Ok(self.entities.read().iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, entity: NewEntity) -> StoreResult<Entity> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entity = entity.with_id(id);
        self.entities.write().push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &Entity) -> StoreResult<()> {
        self.enter()?;
        let mut entities = self.entities.write();
        match entities.iter_mut().find(|e| e.id == entity.id) {
            Some(existing) => {
                existing.name = entity.name.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(entity.id)),
        }
    }

    async fn delete(&self, entity: &Entity) -> StoreResult<()> {
        self.enter()?;
        let mut entities = self.entities.write();
        let before = entities.len();
        entities.retain(|e| e.id != entity.id);
        if entities.len() == before {
            return Err(StoreError::NotFound(entity.id));
        }
        Ok(())
    }
}
