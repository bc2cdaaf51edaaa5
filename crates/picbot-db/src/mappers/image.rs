//! Image entity <-> model mapper

use picbot_core::entities::{MediaItem, NewMediaItem};
use picbot_core::error::DomainError;
use picbot_core::value_objects::{ContentHash, Snowflake};

use crate::models::ImageModel;

use super::collection::stored_name;

/// Convert ImageModel to MediaItem entity
impl TryFrom<ImageModel> for MediaItem {
    type Error = DomainError;

    fn try_from(model: ImageModel) -> Result<Self, Self::Error> {
        let content_hash = ContentHash::from_hex(&model.content_hash)
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(MediaItem {
            id: model.id,
            collection: stored_name(&model.command_name)?,
            storage_key: model.storage_key,
            content_hash,
            user_id: Snowflake::new(model.user_id),
            server_id: model.server_id.map(Snowflake::new),
            created_at: model.created_at,
        })
    }
}

/// Convert NewMediaItem reference to values for database insertion
pub struct ImageInsert<'a> {
    pub command_name: &'a str,
    pub storage_key: &'a str,
    pub content_hash: &'a str,
    pub user_id: i64,
    pub server_id: Option<i64>,
}

impl<'a> ImageInsert<'a> {
    pub fn new(image: &'a NewMediaItem) -> Self {
        Self {
            command_name: image.collection.as_str(),
            storage_key: &image.storage_key,
            content_hash: image.content_hash.as_str(),
            user_id: image.user_id.into_inner(),
            server_id: image.server_id.map(Snowflake::into_inner),
        }
    }
}
