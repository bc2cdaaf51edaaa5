//! PostgreSQL implementation of CollectionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use picbot_core::entities::{CollectionState, CollectionSummary, MediaCollection};
use picbot_core::traits::{CollectionRepository, RepoResult};
use picbot_core::value_objects::CollectionName;

use crate::mappers::CollectionInsert;
use crate::models::{CollectionModel, CollectionSummaryModel};

use super::error::map_db_error;

/// PostgreSQL implementation of CollectionRepository
#[derive(Clone)]
pub struct PgCollectionRepository {
    pool: PgPool,
}

impl PgCollectionRepository {
    /// Create a new PgCollectionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &CollectionName) -> RepoResult<Option<MediaCollection>> {
        let result = sqlx::query_as::<_, CollectionModel>(
            r#"
            SELECT name, owner_id, created_at
            FROM commands
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(MediaCollection::try_from).transpose()
    }

    #[instrument(skip(self), fields(name = %collection.name))]
    async fn get_or_create(&self, collection: &MediaCollection) -> RepoResult<CollectionState> {
        let insert = CollectionInsert::new(collection);

        let created = sqlx::query_as::<_, CollectionModel>(
            r#"
            INSERT INTO commands (name, owner_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            RETURNING name, owner_id, created_at
            "#,
        )
        .bind(insert.name)
        .bind(insert.owner_id)
        .bind(collection.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(model) = created {
            return Ok(CollectionState::Created(MediaCollection::try_from(model)?));
        }

        let existing = sqlx::query_as::<_, CollectionModel>(
            r#"
            SELECT name, owner_id, created_at
            FROM commands
            WHERE name = $1
            "#,
        )
        .bind(insert.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(CollectionState::Existing(MediaCollection::try_from(existing)?))
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &CollectionName) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM commands WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_summaries(&self) -> RepoResult<Vec<CollectionSummary>> {
        let results = sqlx::query_as::<_, CollectionSummaryModel>(
            r#"
            SELECT c.name, COUNT(i.id) AS image_count
            FROM commands c
            LEFT JOIN images i ON i.command_name = c.name
            GROUP BY c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(CollectionSummary::try_from).collect()
    }
}
