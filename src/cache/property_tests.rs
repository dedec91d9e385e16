//! Property-Based Tests for the Entity Cache
//!
//! Random write sequences against an in-memory store; the cached collection
//! must always equal what the store holds.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, DeleteOutcome, EntityCache, EntryOptions};
use crate::db::{EntityStore, MemoryStore};
use crate::error::ServiceError;
use crate::models::{Entity, NewEntity};

// == Test Configuration ==
const WINDOW: Duration = Duration::from_secs(60);
const MAX_ID: i64 = 12;

// == Strategies ==
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum EntityOp {
    Insert { name: String },
    Update { id: i64, name: String },
    Delete { id: i64 },
    Read,
}

fn entity_op_strategy() -> impl Strategy<Value = EntityOp> {
    prop_oneof![
        name_strategy().prop_map(|name| EntityOp::Insert { name }),
        (1..=MAX_ID, name_strategy()).prop_map(|(id, name)| EntityOp::Update { id, name }),
        (0..=MAX_ID).prop_map(|id| EntityOp::Delete { id }),
        Just(EntityOp::Read),
    ]
}

fn seeded(names: &[String]) -> (Arc<MemoryStore>, EntityCache) {
    let store = Arc::new(MemoryStore::with_names(names.iter().cloned()));
    let cache = EntityCache::new(Arc::clone(&store) as Arc<dyn EntityStore>, WINDOW);
    (store, cache)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After every operation the cached collection mirrors the store, and the
    // store is read in full at most once inside the window.
    #[test]
    fn prop_cache_agrees_with_store(
        seed in prop::collection::vec(name_strategy(), 0..6),
        ops in prop::collection::vec(entity_op_strategy(), 1..40)
    ) {
        let (store, cache) = seeded(&seed);

        tokio_test::block_on(async {
            for op in ops {
                let existed = |id: i64| store.snapshot().iter().any(|e| e.id == id);
                match op {
                    EntityOp::Insert { name } => {
                        let created = cache.insert(NewEntity::new(name)).await.unwrap();
                        prop_assert!(created.id > 0);
                    }
                    EntityOp::Update { id, name } => {
                        let present = existed(id);
                        let result = cache.update(Entity::new(id, name)).await;
                        prop_assert_eq!(result.is_ok(), present);
                        if !present {
                            prop_assert!(matches!(result, Err(ServiceError::NotFound(_))));
                        }
                    }
                    EntityOp::Delete { id } => {
                        let present = existed(id);
                        match cache.delete(id).await {
                            Ok(DeleteOutcome::Skipped) => prop_assert_eq!(id, 0),
                            Ok(DeleteOutcome::Deleted) => prop_assert!(present),
                            Err(ServiceError::NotFound(_)) => prop_assert!(!present),
                            Err(other) => prop_assert!(false, "unexpected error: {}", other),
                        }
                    }
                    EntityOp::Read => {}
                }

                if cache.is_populated().await {
                    let cached = cache.ensure_populated().await.unwrap();
                    prop_assert_eq!(cached, store.snapshot());
                }
            }

            let cached = cache.ensure_populated().await.unwrap();
            prop_assert_eq!(cached, store.snapshot());
            prop_assert_eq!(store.fetch_all_calls(), 1, "collection re-fetched inside window");
            Ok(())
        })?;
    }

    // Updating keeps every element's position; only the targeted name changes.
    #[test]
    fn prop_update_preserves_order(
        seed in prop::collection::vec(name_strategy(), 1..10),
        pick in any::<prop::sample::Index>(),
        name in name_strategy()
    ) {
        let (_store, cache) = seeded(&seed);

        tokio_test::block_on(async {
            let before = cache.ensure_populated().await.unwrap();
            let target = before[pick.index(before.len())].id;

            cache.update(Entity::new(target, name.clone())).await.unwrap();
            let after = cache.ensure_populated().await.unwrap();

            prop_assert_eq!(after.len(), before.len());
            for (old, new) in before.iter().zip(after.iter()) {
                prop_assert_eq!(old.id, new.id);
                if new.id == target {
                    prop_assert_eq!(&new.name, &name);
                } else {
                    prop_assert_eq!(&new.name, &old.name);
                }
            }
            Ok(())
        })?;
    }
}

// == Concurrent Writers ==
// The slot mutex serializes read-modify-replace, so no write is lost.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_writes_not_lost(
        seed in prop::collection::vec(name_strategy(), 0..6),
        ops in prop::collection::vec(entity_op_strategy(), 10..60)
    ) {
        let (store, cache) = seeded(&seed);
        let cache = Arc::new(cache);

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            // Warm the slot so writers race on a populated entry
            cache.ensure_populated().await.unwrap();

            let mut handles = vec![];
            for op in ops {
                let cache = Arc::clone(&cache);
                handles.push(tokio::spawn(async move {
                    match op {
                        EntityOp::Insert { name } => {
                            cache.insert(NewEntity::new(name)).await.map(|_| ())
                        }
                        EntityOp::Update { id, name } => {
                            cache.update(Entity::new(id, name)).await.map(|_| ())
                        }
                        EntityOp::Delete { id } => cache.delete(id).await.map(|_| ()),
                        EntityOp::Read => cache.ensure_populated().await.map(|_| ()),
                    }
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                if let Err(err) = result {
                    prop_assert!(
                        matches!(err, ServiceError::NotFound(_)),
                        "unexpected error: {}",
                        err
                    );
                }
            }

            let cached = cache.ensure_populated().await.unwrap();
            prop_assert_eq!(cached, store.snapshot());
            Ok(())
        })?;
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaced_entry_is_independent_copy() {
        let mut slot: CacheStore<Vec<Entity>> = CacheStore::new();
        slot.set("Entity", vec![Entity::new(1, "a")], EntryOptions::sliding(WINDOW));

        let mut copy = slot.try_get("Entity").cloned().unwrap();
        copy.push(Entity::new(2, "b"));

        // Nothing changes until the copy is set back
        assert_eq!(slot.try_get("Entity").map(Vec::len), Some(1));
        slot.set("Entity", copy, EntryOptions::sliding(WINDOW));
        assert_eq!(slot.try_get("Entity").map(Vec::len), Some(2));
    }
}
