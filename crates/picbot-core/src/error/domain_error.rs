//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::CollectionNameError;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No collection named `{0}`")]
    CollectionNotFound(String),

    #[error("No image `{key}` in `{collection}`")]
    ImageNotFound { collection: String, key: String },

    #[error("No alias named `{0}`")]
    AliasNotFound(String),

    #[error("Collection `{0}` has no images you can see")]
    NoVisibleImages(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(#[from] CollectionNameError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Nothing to add: attach a file or give a link")]
    MissingMedia,

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("File too large: max {max_mb} MB")]
    MediaTooLarge { max_mb: u64 },

    #[error("Could not download media: {0}")]
    DownloadFailed(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the image owner or the moderator can do that")]
    NotImageOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("That image is already in `{0}`")]
    DuplicateContent(String),

    #[error("Storage key `{0}` already taken")]
    StorageKeyTaken(String),

    #[error("Name `{0}` is already used by a collection or alias")]
    NameTaken(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Submission contains {0} files; submit one at a time")]
    MultipleFiles(usize),

    #[error("Transcoding failed: {0}")]
    TranscodeFailed(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Chat platform unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Chat platform error: {0}")]
    GatewayError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CollectionNotFound(_) => "UNKNOWN_COLLECTION",
            Self::ImageNotFound { .. } => "UNKNOWN_IMAGE",
            Self::AliasNotFound(_) => "UNKNOWN_ALIAS",
            Self::NoVisibleImages(_) => "NO_VISIBLE_IMAGES",

            // Validation
            Self::InvalidCollectionName(_) => "INVALID_COLLECTION_NAME",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingMedia => "MISSING_MEDIA",
            Self::UnsupportedMedia(_) => "UNSUPPORTED_MEDIA",
            Self::MediaTooLarge { .. } => "MEDIA_TOO_LARGE",
            Self::DownloadFailed(_) => "DOWNLOAD_FAILED",

            // Authorization
            Self::NotImageOwner => "NOT_IMAGE_OWNER",

            // Conflict
            Self::DuplicateContent(_) => "DUPLICATE_CONTENT",
            Self::StorageKeyTaken(_) => "STORAGE_KEY_TAKEN",
            Self::NameTaken(_) => "NAME_TAKEN",

            // Business Rules
            Self::MultipleFiles(_) => "MULTIPLE_FILES",
            Self::TranscodeFailed(_) => "TRANSCODE_FAILED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
            Self::GatewayError(_) => "GATEWAY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CollectionNotFound(_)
                | Self::ImageNotFound { .. }
                | Self::AliasNotFound(_)
                | Self::NoVisibleImages(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCollectionName(_)
                | Self::ValidationError(_)
                | Self::MissingMedia
                | Self::UnsupportedMedia(_)
                | Self::MediaTooLarge { .. }
                | Self::DownloadFailed(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotImageOwner)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateContent(_) | Self::StorageKeyTaken(_) | Self::NameTaken(_)
        )
    }

    /// Check if retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::GatewayUnavailable(_))
    }
}
