//! Error handling utilities for repositories

use picbot_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Unique constraint on `(command_name, content_hash)`
pub const IMAGE_HASH_CONSTRAINT: &str = "images_command_content_hash_key";

/// Unique constraint on `(command_name, storage_key)`
pub const IMAGE_KEY_CONSTRAINT: &str = "images_command_storage_key_key";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
///
/// `on_unique` receives the violated constraint name when the driver reports one.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}
