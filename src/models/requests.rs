//! Request DTOs for the entity API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::error::{Result, ServiceError};
use crate::models::entity::{Entity, NewEntity, MAX_NAME_LENGTH};

/// Request body for POST and PUT on `/api/cache`.
///
/// # Fields
/// - `id`: Omitted or 0 on create, the existing record's id on update
/// - `name`: Required, at most 50 characters
///
/// PascalCase field names are accepted as well.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRequest {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

impl EntityRequest {
    /// Validates the body for a create and returns the insert payload.
    pub fn into_new_entity(self) -> Result<NewEntity> {
        if self.id != 0 {
            return Err(ServiceError::InvalidRequest(
                "Id must be omitted or 0 when creating an entity".to_string(),
            ));
        }
        let name = validate_name(self.name)?;
        Ok(NewEntity::new(name))
    }

    /// Validates the body for an update and returns the replacement entity.
    pub fn into_entity(self) -> Result<Entity> {
        if self.id <= 0 {
            return Err(ServiceError::InvalidRequest(
                "Id of an existing entity is required".to_string(),
            ));
        }
        let name = validate_name(self.name)?;
        Ok(Entity::new(self.id, name))
    }
}

fn validate_name(name: Option<String>) -> Result<String> {
    let name = name.ok_or_else(|| ServiceError::InvalidRequest("Name is required".to_string()))?;
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ServiceError::InvalidRequest(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name)
}

/// Query string for DELETE `/api/cache?id={id}`.
///
/// A missing id binds to 0, which the delete path treats as the no-op sentinel.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub id: i64,
}
