//! Submission entities - media offered for a collection and awaiting approval

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::entities::Invocation;
use crate::value_objects::{CollectionName, ContentHash, Snowflake};

/// Where the submitted media comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSource {
    /// A link given as command argument
    Url(String),
    /// Files attached to the command message
    Attachments(Vec<Attachment>),
}

/// File attached to a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            content_type: None,
        }
    }

    /// Check that the platform's content type, when it gives one, is an
    /// image or video
    pub fn may_be_media(&self) -> bool {
        match self.content_type.as_deref() {
            Some(t) => t.starts_with("image/") || t.starts_with("video/"),
            None => true,
        }
    }
}

/// An approval request in flight, keyed by the proposal message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Id of the proposal message posted to the moderator
    pub request_id: Snowflake,
    /// DM channel the proposal was posted in
    pub channel_id: Snowflake,
    pub collection: CollectionName,
    pub submitter: Invocation,
    pub local_path: PathBuf,
    pub file_name: String,
    pub content_hash: ContentHash,
    pub created_at: DateTime<Utc>,
}
