//! Collection database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for commands table
#[derive(Debug, Clone, FromRow)]
pub struct CollectionModel {
    pub name: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Collection name with its image count (from query)
#[derive(Debug, Clone, FromRow)]
pub struct CollectionSummaryModel {
    pub name: String,
    pub image_count: i64,
}
