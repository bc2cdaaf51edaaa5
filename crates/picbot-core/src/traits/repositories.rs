//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{
    Alias, CollectionState, CollectionSummary, MediaCollection, MediaItem, NewMediaItem,
};
use crate::error::DomainError;
use crate::value_objects::{CollectionName, ContentHash, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Collection Repository
// ============================================================================

#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Find collection by name
    async fn find_by_name(&self, name: &CollectionName) -> RepoResult<Option<MediaCollection>>;

    /// Insert the collection unless one with the same name exists
    async fn get_or_create(&self, collection: &MediaCollection) -> RepoResult<CollectionState>;

    /// Delete a collection (images, associations and aliases cascade)
    async fn delete(&self, name: &CollectionName) -> RepoResult<()>;

    /// List every collection with its image count, ordered by name
    async fn list_summaries(&self) -> RepoResult<Vec<CollectionSummary>>;
}

// ============================================================================
// Image Repository
// ============================================================================

#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Check if the collection already holds content with this hash
    async fn has_hash(&self, collection: &CollectionName, hash: &ContentHash) -> RepoResult<bool>;

    /// Check if a storage key is taken within the collection
    async fn key_exists(&self, collection: &CollectionName, storage_key: &str) -> RepoResult<bool>;

    /// Insert an approved image
    async fn create(&self, image: &NewMediaItem) -> RepoResult<MediaItem>;

    /// Find image by storage key
    async fn find_by_key(
        &self,
        collection: &CollectionName,
        storage_key: &str,
    ) -> RepoResult<Option<MediaItem>>;

    /// List all images in a collection, oldest first
    async fn find_by_collection(&self, collection: &CollectionName) -> RepoResult<Vec<MediaItem>>;

    /// Claim an unowned image for a server
    async fn set_server(&self, id: i64, server_id: Snowflake) -> RepoResult<()>;

    /// Delete an image row
    async fn delete(&self, id: i64) -> RepoResult<()>;

    /// Number of images in a collection
    async fn count(&self, collection: &CollectionName) -> RepoResult<i64>;
}

// ============================================================================
// Server Association Repository
// ============================================================================

#[async_trait]
pub trait ServerAssociationRepository: Send + Sync {
    /// Servers the collection originates from
    async fn find_servers(&self, collection: &CollectionName) -> RepoResult<Vec<Snowflake>>;

    /// Associate a server with the collection (no-op if present)
    async fn add(&self, collection: &CollectionName, server_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Alias Repository
// ============================================================================

#[async_trait]
pub trait AliasRepository: Send + Sync {
    /// Resolve an alias to its target collection
    async fn resolve(&self, alias: &CollectionName) -> RepoResult<Option<CollectionName>>;

    /// Create an alias
    async fn create(&self, alias: &Alias) -> RepoResult<()>;

    /// Delete an alias, returning whether it existed
    async fn delete(&self, alias: &CollectionName) -> RepoResult<bool>;
}
