//! Duplicate check - content hash lookup within a collection

use picbot_core::{CollectionName, ContentHash, DomainError};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Duplicate check
pub struct DuplicateCheck<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DuplicateCheck<'a> {
    /// Create a new DuplicateCheck
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check whether the collection already holds this content
    #[instrument(skip(self))]
    pub async fn has_hash(&self, collection: &CollectionName, hash: &ContentHash) -> ServiceResult<bool> {
        let exists = self.ctx.image_repo().has_hash(collection, hash).await?;
        debug!(exists, "duplicate lookup");
        Ok(exists)
    }

    /// Fail with `DuplicateContent` if the collection already holds this content
    pub async fn ensure_new(&self, collection: &CollectionName, hash: &ContentHash) -> ServiceResult<()> {
        if self.has_hash(collection, hash).await? {
            return Err(DomainError::DuplicateContent(collection.to_string()).into());
        }
        Ok(())
    }
}
