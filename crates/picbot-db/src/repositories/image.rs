//! PostgreSQL implementation of ImageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use picbot_core::entities::{MediaItem, NewMediaItem};
use picbot_core::error::DomainError;
use picbot_core::traits::{ImageRepository, RepoResult};
use picbot_core::value_objects::{CollectionName, ContentHash, Snowflake};

use crate::mappers::ImageInsert;
use crate::models::ImageModel;

use super::error::{
    map_db_error, map_unique_violation, IMAGE_HASH_CONSTRAINT, IMAGE_KEY_CONSTRAINT,
};

/// PostgreSQL implementation of ImageRepository
#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    /// Create a new PgImageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    #[instrument(skip(self))]
    async fn has_hash(&self, collection: &CollectionName, hash: &ContentHash) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM images WHERE command_name = $1 AND content_hash = $2
            )
            "#,
        )
        .bind(collection.as_str())
        .bind(hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn key_exists(&self, collection: &CollectionName, storage_key: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM images WHERE command_name = $1 AND storage_key = $2
            )
            "#,
        )
        .bind(collection.as_str())
        .bind(storage_key)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self), fields(collection = %image.collection, key = %image.storage_key))]
    async fn create(&self, image: &NewMediaItem) -> RepoResult<MediaItem> {
        let insert = ImageInsert::new(image);

        let model = sqlx::query_as::<_, ImageModel>(
            r#"
            INSERT INTO images (command_name, storage_key, content_hash, user_id, server_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, command_name, storage_key, content_hash, user_id, server_id, created_at
            "#,
        )
        .bind(insert.command_name)
        .bind(insert.storage_key)
        .bind(insert.content_hash)
        .bind(insert.user_id)
        .bind(insert.server_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |constraint| image_conflict(constraint, &insert)))?;

        MediaItem::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_by_key(
        &self,
        collection: &CollectionName,
        storage_key: &str,
    ) -> RepoResult<Option<MediaItem>> {
        let result = sqlx::query_as::<_, ImageModel>(
            r#"
            SELECT id, command_name, storage_key, content_hash, user_id, server_id, created_at
            FROM images
            WHERE command_name = $1 AND storage_key = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(storage_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MediaItem::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_collection(&self, collection: &CollectionName) -> RepoResult<Vec<MediaItem>> {
        let results = sqlx::query_as::<_, ImageModel>(
            r#"
            SELECT id, command_name, storage_key, content_hash, user_id, server_id, created_at
            FROM images
            WHERE command_name = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(MediaItem::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn set_server(&self, id: i64, server_id: Snowflake) -> RepoResult<()> {
        // Never steal an image another server already claimed
        sqlx::query(
            r#"
            UPDATE images SET server_id = $2 WHERE id = $1 AND server_id IS NULL
            "#,
        )
        .bind(id)
        .bind(server_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM images WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, collection: &CollectionName) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM images WHERE command_name = $1
            "#,
        )
        .bind(collection.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

/// Domain error for a unique violation on `images`
fn image_conflict(constraint: Option<&str>, insert: &ImageInsert<'_>) -> DomainError {
    match constraint {
        Some(IMAGE_HASH_CONSTRAINT) => {
            DomainError::DuplicateContent(insert.command_name.to_string())
        }
        Some(IMAGE_KEY_CONSTRAINT) => DomainError::StorageKeyTaken(insert.storage_key.to_string()),
        other => DomainError::DatabaseError(format!(
            "unique violation on {}",
            other.unwrap_or("an unnamed constraint")
        )),
    }
}
