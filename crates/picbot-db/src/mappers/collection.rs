//! Collection entity <-> model mapper

use picbot_core::entities::{CollectionSummary, MediaCollection};
use picbot_core::error::DomainError;
use picbot_core::value_objects::{CollectionName, Snowflake};

use crate::models::{CollectionModel, CollectionSummaryModel};

/// Parse a stored collection name
pub(crate) fn stored_name(raw: &str) -> Result<CollectionName, DomainError> {
    CollectionName::parse(raw)
        .map_err(|e| DomainError::DatabaseError(format!("corrupt collection name `{raw}`: {e}")))
}

/// Convert CollectionModel to MediaCollection entity
impl TryFrom<CollectionModel> for MediaCollection {
    type Error = DomainError;

    fn try_from(model: CollectionModel) -> Result<Self, Self::Error> {
        Ok(MediaCollection {
            name: stored_name(&model.name)?,
            owner_id: model.owner_id.map(Snowflake::new),
            created_at: model.created_at,
        })
    }
}

impl TryFrom<CollectionSummaryModel> for CollectionSummary {
    type Error = DomainError;

    fn try_from(model: CollectionSummaryModel) -> Result<Self, Self::Error> {
        Ok(CollectionSummary {
            name: stored_name(&model.name)?,
            image_count: model.image_count,
        })
    }
}

/// Convert MediaCollection entity reference to values for database insertion
pub struct CollectionInsert<'a> {
    pub name: &'a str,
    pub owner_id: Option<i64>,
}

impl<'a> CollectionInsert<'a> {
    pub fn new(collection: &'a MediaCollection) -> Self {
        Self {
            name: collection.name.as_str(),
            owner_id: collection.owner_id.map(Snowflake::into_inner),
        }
    }
}
