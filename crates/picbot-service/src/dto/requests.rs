//! Request DTOs for bot commands
//!
//! Request DTOs implement `Validate` for input validation before any
//! network or database work starts.

use picbot_core::entities::{Invocation, SubmissionSource};
use validator::Validate;

// ============================================================================
// Picture Requests
// ============================================================================

/// Add a picture to a collection (`addpic <name> [url]`)
#[derive(Debug, Clone, Validate)]
pub struct SubmissionRequest {
    #[validate(length(min = 1, max = 32, message = "Collection name must be 1-32 characters"))]
    pub collection: String,

    /// Who asked, and from where
    pub submitter: Invocation,

    pub source: SubmissionSource,
}

impl SubmissionRequest {
    pub fn new(
        collection: impl Into<String>,
        submitter: Invocation,
        source: SubmissionSource,
    ) -> Self {
        Self {
            collection: collection.into(),
            submitter,
            source,
        }
    }
}

/// Remove a picture (`rmpic <name> <key>`)
#[derive(Debug, Clone, Validate)]
pub struct RemovePictureRequest {
    #[validate(length(min = 1, max = 32, message = "Collection name must be 1-32 characters"))]
    pub collection: String,

    #[validate(length(min = 1, max = 255, message = "Image key must be 1-255 characters"))]
    pub storage_key: String,
}

// ============================================================================
// Alias Requests
// ============================================================================

/// Create an alias (`alias <alias> <name>`)
#[derive(Debug, Clone, Validate)]
pub struct CreateAliasRequest {
    #[validate(length(min = 1, max = 32, message = "Alias must be 1-32 characters"))]
    pub alias: String,

    #[validate(length(min = 1, max = 32, message = "Collection name must be 1-32 characters"))]
    pub target: String,
}
