//! Entity Model
//!
//! The single relational record managed by the service.

use serde::{Deserialize, Serialize};

/// Maximum allowed length of an entity name, in characters.
pub const MAX_NAME_LENGTH: usize = 50;

// == Entity ==
/// A persisted record. `id` is assigned by the store and is the only key
/// the cache uses for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,
}

impl Entity {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// == New Entity ==
/// Insert payload before the store has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    pub name: String,
}

impl NewEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Attaches the identifier the store assigned on insert.
    pub fn with_id(self, id: i64) -> Entity {
        Entity { id, name: self.name }
    }
}
