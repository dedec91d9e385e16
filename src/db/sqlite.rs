//! SQLite-backed entity store.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::{Entity, NewEntity};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
"#;

/// Entity store over a single SQLite connection.
///
/// Statements run on tokio's blocking pool; the connection is shared behind
/// a mutex so the store is `Send + Sync`.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create the database at the given path.
    ///
    /// The special path `:memory:` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path == Path::new(":memory:") {
            return Self::open_in_memory();
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::with_schema(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn call<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await?;
        Ok(result?)
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn fetch_all(&self) -> StoreResult<Vec<Entity>> {
        let entities = self
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, name FROM entities ORDER BY id")?;
                let rows = stmt.query_map([], row_to_entity)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        debug!(count = entities.len(), "Fetched all entities");
        Ok(entities)
    }

    async fn fetch_by_id(&self, id: i64) -> StoreResult<Option<Entity>> {
        self.call(move |conn| {
            conn.query_row(
                "SELECT id, name FROM entities WHERE id = ?1",
                params![id],
                row_to_entity,
            )
            .optional()
        })
        .await
    }

    async fn insert(&self, entity: NewEntity) -> StoreResult<Entity> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO entities (name) VALUES (?1)",
                params![entity.name],
            )?;
            Ok(entity.with_id(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update(&self, entity: &Entity) -> StoreResult<()> {
        let Entity { id, name } = entity.clone();
        let changed = self
            .call(move |conn| {
                conn.execute(
                    "UPDATE entities SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )
            })
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, entity: &Entity) -> StoreResult<()> {
        let id = entity.id;
        let changed = self
            .call(move |conn| conn.execute("DELETE FROM entities WHERE id = ?1", params![id]))
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn row_to_entity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
