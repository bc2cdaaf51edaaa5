//! External service ports - chat platform, object store, media downloads

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::entities::ReactionCount;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for external service calls
pub type PortResult<T> = Result<T, DomainError>;

// ============================================================================
// Chat Gateway
// ============================================================================

/// Outbound operations against the chat platform
///
/// Connection loss and rate limiting must surface as
/// [`DomainError::GatewayUnavailable`] so callers can retry.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Post a text message, returning its id
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake>;

    /// Post a message with one file attached, returning its id
    async fn send_file(
        &self,
        channel_id: Snowflake,
        content: &str,
        path: &Path,
        file_name: &str,
    ) -> PortResult<Snowflake>;

    /// React to a message as the bot
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PortResult<()>;

    /// Current aggregated reactions of a message
    async fn get_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Vec<ReactionCount>>;

    /// Open (or fetch) the DM channel with a user
    async fn open_dm(&self, user_id: Snowflake) -> PortResult<Snowflake>;
}

// ============================================================================
// Object Store
// ============================================================================

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under `key`
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
        public_read: bool,
    ) -> PortResult<()>;

    /// Delete the object stored under `key`
    async fn delete(&self, key: &str) -> PortResult<()>;

    /// Public URL of an object
    fn public_url(&self, key: &str) -> String;
}

// ============================================================================
// Media Fetcher
// ============================================================================

/// Scoped temporary storage; the directory and its contents are removed when dropped
pub trait TempScope: Send + Sync + fmt::Debug {
    fn path(&self) -> &Path;
}

/// A downloaded media file living in its own temporary directory
#[derive(Debug)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub path: PathBuf,
    pub file_name: String,
    /// Keeps the temporary directory alive
    pub scope: Box<dyn TempScope>,
}

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download `url`, naming the local file after `file_name` when given
    ///
    /// Oversized videos are transcoded to fit the upload budget.
    async fn fetch(&self, url: &str, file_name: Option<&str>) -> PortResult<FetchedMedia>;
}
