//! PostgreSQL implementation of AliasRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use picbot_core::entities::Alias;
use picbot_core::error::DomainError;
use picbot_core::traits::{AliasRepository, RepoResult};
use picbot_core::value_objects::CollectionName;

use crate::mappers::stored_name;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of AliasRepository
#[derive(Clone)]
pub struct PgAliasRepository {
    pool: PgPool,
}

impl PgAliasRepository {
    /// Create a new PgAliasRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AliasRepository for PgAliasRepository {
    #[instrument(skip(self))]
    async fn resolve(&self, alias: &CollectionName) -> RepoResult<Option<CollectionName>> {
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT command_name FROM aliases WHERE alias = $1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.as_deref().map(stored_name).transpose()
    }

    #[instrument(skip(self), fields(alias = %alias.alias, target = %alias.target))]
    async fn create(&self, alias: &Alias) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO aliases (alias, command_name)
            VALUES ($1, $2)
            "#,
        )
        .bind(alias.alias.as_str())
        .bind(alias.target.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::NameTaken(alias.alias.to_string())))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, alias: &CollectionName) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM aliases WHERE alias = $1
            "#,
        )
        .bind(alias.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
