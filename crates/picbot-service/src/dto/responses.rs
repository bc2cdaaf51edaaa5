//! Response DTOs returned by the services
//!
//! The bot renders these as chat messages; they also serialize to JSON for logs.

use picbot_core::entities::CollectionSummary;
use serde::Serialize;

// ============================================================================
// Picture Responses
// ============================================================================

/// A picture picked for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureResponse {
    pub collection: String,
    pub storage_key: String,
    pub url: String,
}

/// One line of the collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionListing {
    pub name: String,
    pub image_count: i64,
}

impl From<CollectionSummary> for CollectionListing {
    fn from(summary: CollectionSummary) -> Self {
        Self {
            name: summary.name.to_string(),
            image_count: summary.image_count,
        }
    }
}

// ============================================================================
// Submission Responses
// ============================================================================

/// An approved image persisted to the store and database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedImage {
    pub collection: String,
    pub storage_key: String,
    pub url: String,
    /// The submission created the collection
    pub created_collection: bool,
}

/// Final result of one submission flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Added(CommittedImage),
    Duplicate { collection: String },
    Rejected { collection: String },
    UserError { message: String },
    Failed { message: String },
}

impl SubmissionOutcome {
    /// Whether the image ended up in the collection
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}
