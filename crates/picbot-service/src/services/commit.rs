//! Commit service - persists an approved submission

use std::iter;

use picbot_core::entities::{
    object_key, sanitize_file_name, storage_key_candidate, CollectionState, MediaCollection,
    NewMediaItem,
};
use picbot_core::{DomainError, MediaItem};
use tracing::{debug, info, instrument, warn};

use crate::dto::CommittedImage;

use super::context::ServiceContext;
use super::duplicate::DuplicateCheck;
use super::error::{ServiceError, ServiceResult};
use super::intake::Submission;

/// Numbered candidates tried after the literal file name
const MAX_KEY_ATTEMPTS: u32 = 1000;

/// Commit service
pub struct CommitService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommitService<'a> {
    /// Create a new CommitService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store an approved submission
    ///
    /// Re-checks for duplicates, creates the collection on first use, claims a
    /// free storage key by inserting the image row and only then uploads the
    /// file. A failed upload removes the claimed row again.
    #[instrument(skip(self, submission), fields(collection = %submission.collection))]
    pub async fn commit(&self, submission: &Submission) -> ServiceResult<CommittedImage> {
        let collection = &submission.collection;
        DuplicateCheck::new(self.ctx)
            .ensure_new(collection, &submission.content_hash)
            .await?;

        let state = self
            .ctx
            .collection_repo()
            .get_or_create(&MediaCollection::new(
                collection.clone(),
                Some(submission.submitter.user_id),
            ))
            .await?;

        if let Some(server_id) = submission.submitter.server_id {
            let record = match &state {
                CollectionState::Created(_) => true,
                // A collection without associations is global; keep it that way
                CollectionState::Existing(_) => !self
                    .ctx
                    .association_repo()
                    .find_servers(collection)
                    .await?
                    .is_empty(),
            };
            if record {
                self.ctx.association_repo().add(collection, server_id).await?;
            }
        }

        let image = self.claim_storage_key(submission).await?;
        let key = object_key(collection, &image.storage_key);
        let content_type = mime_guess::from_path(&image.storage_key)
            .first_or_octet_stream()
            .to_string();

        if let Err(e) = self
            .ctx
            .store()
            .upload(&submission.media.path, &key, &content_type, true)
            .await
        {
            self.release(&image, state.is_created()).await;
            return Err(e.into());
        }

        info!(
            storage_key = %image.storage_key,
            created_collection = state.is_created(),
            "Image committed"
        );

        Ok(CommittedImage {
            collection: collection.to_string(),
            url: self.ctx.store().public_url(&key),
            storage_key: image.storage_key,
            created_collection: state.is_created(),
        })
    }

    /// Insert the image row under the first storage key nobody holds
    ///
    /// Tries the file name as is, then `<stem>0.<ext>`, `<stem>1.<ext>` and so
    /// on. A key taken between the lookup and the insert moves on to the next
    /// candidate.
    async fn claim_storage_key(&self, submission: &Submission) -> ServiceResult<MediaItem> {
        let collection = &submission.collection;
        let base = sanitize_file_name(&submission.media.file_name);
        let attempts = iter::once(None).chain((0..MAX_KEY_ATTEMPTS).map(Some));

        for attempt in attempts {
            let candidate = storage_key_candidate(&base, attempt);
            if self.ctx.image_repo().key_exists(collection, &candidate).await? {
                continue;
            }

            let new_item = NewMediaItem {
                collection: collection.clone(),
                storage_key: candidate,
                content_hash: submission.content_hash.clone(),
                user_id: submission.submitter.user_id,
                server_id: submission.submitter.server_id,
            };
            match self.ctx.image_repo().create(&new_item).await {
                Ok(image) => return Ok(image),
                Err(DomainError::StorageKeyTaken(key)) => {
                    debug!(storage_key = %key, "storage key claimed concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Domain(DomainError::StorageKeyTaken(base)))
    }

    /// Undo a claimed row whose upload failed
    async fn release(&self, image: &MediaItem, created_collection: bool) {
        if let Err(e) = self.ctx.image_repo().delete(image.id).await {
            warn!(storage_key = %image.storage_key, error = %e, "could not remove claimed image row");
            return;
        }
        if !created_collection {
            return;
        }
        match self.ctx.image_repo().count(&image.collection).await {
            Ok(0) => {
                if let Err(e) = self.ctx.collection_repo().delete(&image.collection).await {
                    warn!(collection = %image.collection, error = %e, "could not remove empty collection");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(collection = %image.collection, error = %e, "could not count images"),
        }
    }
}
