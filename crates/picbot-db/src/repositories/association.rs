//! PostgreSQL implementation of ServerAssociationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use picbot_core::traits::{RepoResult, ServerAssociationRepository};
use picbot_core::value_objects::{CollectionName, Snowflake};

use super::error::map_db_error;

/// PostgreSQL implementation of ServerAssociationRepository
#[derive(Clone)]
pub struct PgServerAssociationRepository {
    pool: PgPool,
}

impl PgServerAssociationRepository {
    /// Create a new PgServerAssociationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerAssociationRepository for PgServerAssociationRepository {
    #[instrument(skip(self))]
    async fn find_servers(&self, collection: &CollectionName) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT server_id
            FROM server_command_associations
            WHERE command_name = $1
            ORDER BY server_id
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn add(&self, collection: &CollectionName, server_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO server_command_associations (command_name, server_id)
            VALUES ($1, $2)
            ON CONFLICT (command_name, server_id) DO NOTHING
            "#,
        )
        .bind(collection.as_str())
        .bind(server_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
