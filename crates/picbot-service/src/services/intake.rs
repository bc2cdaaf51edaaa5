//! Submission intake
//!
//! Validates an `addpic` request, downloads the media into a scratch
//! directory and hashes it.

use md5::{Digest, Md5};
use picbot_core::entities::{Invocation, SubmissionSource};
use picbot_core::traits::FetchedMedia;
use picbot_core::{CollectionName, ContentHash, DomainError};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::SubmissionRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A downloaded, hashed submission ready for duplicate check and approval
///
/// Owns the scratch directory; dropping it deletes the local file.
#[derive(Debug)]
pub struct Submission {
    pub collection: CollectionName,
    pub submitter: Invocation,
    pub media: FetchedMedia,
    pub content_hash: ContentHash,
}

/// Intake service
pub struct IntakeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IntakeService<'a> {
    /// Create a new IntakeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Accept a submission request
    #[instrument(skip(self, request), fields(collection = %request.collection, user_id = %request.submitter.user_id))]
    pub async fn receive(&self, request: SubmissionRequest) -> ServiceResult<Submission> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let collection = CollectionName::parse(&request.collection).map_err(DomainError::from)?;
        let (url, file_name) = select_source(request.source)?;

        let mut media = self.ctx.fetcher().fetch(&url, file_name.as_deref()).await?;
        let content_hash = hash_media(&mut media).await?;

        info!(
            file_name = %media.file_name,
            size = media.bytes.len(),
            hash = %content_hash,
            "Submission received"
        );

        Ok(Submission {
            collection,
            submitter: request.submitter,
            media,
            content_hash,
        })
    }
}

/// Pick the single download URL and its preferred file name
fn select_source(source: SubmissionSource) -> Result<(String, Option<String>), DomainError> {
    let (url, file_name) = match source {
        SubmissionSource::Url(url) => (url, None),
        SubmissionSource::Attachments(mut attachments) => match attachments.len() {
            0 => return Err(DomainError::MissingMedia),
            1 => {
                let attachment = attachments.remove(0);
                if !attachment.may_be_media() {
                    return Err(DomainError::UnsupportedMedia(
                        attachment.content_type.unwrap_or_default(),
                    ));
                }
                (attachment.url, Some(attachment.filename))
            }
            n => return Err(DomainError::MultipleFiles(n)),
        },
    };

    let url = url.trim();
    if url.is_empty() {
        return Err(DomainError::MissingMedia);
    }
    // Chat clients wrap links in <> to suppress embeds
    let url = url.trim_start_matches('<').trim_end_matches('>');
    Ok((url.to_string(), file_name))
}

/// MD5 of the media bytes, computed off the async workers
async fn hash_media(media: &mut FetchedMedia) -> ServiceResult<ContentHash> {
    let bytes = std::mem::take(&mut media.bytes);
    let (bytes, hash) = tokio::task::spawn_blocking(move || {
        let hash = content_hash(&bytes);
        (bytes, hash)
    })
    .await
    .map_err(|e| ServiceError::internal(format!("hashing task failed: {e}")))?;

    media.bytes = bytes;
    Ok(hash)
}

/// MD5 content hash of raw bytes
pub fn content_hash(bytes: &[u8]) -> ContentHash {
    let digest = Md5::digest(bytes);
    let mut raw = [0u8; 16];
    raw.copy_from_slice(&digest);
    ContentHash::from_digest(raw)
}
