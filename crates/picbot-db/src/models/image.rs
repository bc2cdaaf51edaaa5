//! Image database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for images table
#[derive(Debug, Clone, FromRow)]
pub struct ImageModel {
    pub id: i64,
    pub command_name: String,
    pub storage_key: String,
    pub content_hash: String,
    pub user_id: i64,
    pub server_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl ImageModel {
    /// Check if the image has been claimed by a server
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.server_id.is_some()
    }
}
