//! Picture service - showing, listing and removing pictures, and aliases

use picbot_core::entities::{Alias, Invocation, MediaCollection, MediaItem};
use picbot_core::{CollectionName, DomainError};
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{CollectionListing, CreateAliasRequest, PictureResponse, RemovePictureRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Picture service
pub struct PictureService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PictureService<'a> {
    /// Create a new PictureService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Collection a name refers to, following aliases
    pub async fn resolve(&self, name: &str) -> ServiceResult<CollectionName> {
        let name = CollectionName::parse(name).map_err(DomainError::from)?;
        match self.ctx.alias_repo().resolve(&name).await? {
            Some(target) => {
                debug!(alias = %name, target = %target, "alias resolved");
                Ok(target)
            }
            None => Ok(name),
        }
    }

    /// Pick a random picture the invoker may see
    ///
    /// An image without a server that is shown inside a server is claimed by
    /// that server.
    #[instrument(skip(self, invocation), fields(user_id = %invocation.user_id))]
    pub async fn random_picture(
        &self,
        name: &str,
        invocation: &Invocation,
    ) -> ServiceResult<PictureResponse> {
        let collection = self.visible_collection(name, invocation).await?;

        let visible: Vec<MediaItem> = self
            .ctx
            .image_repo()
            .find_by_collection(&collection.name)
            .await?
            .into_iter()
            .filter(|image| image.is_visible_to(invocation))
            .collect();

        let picked = visible.choose(&mut rand::thread_rng()).cloned();
        let image = picked.ok_or_else(|| DomainError::NoVisibleImages(collection.name.to_string()))?;

        if let Some(server_id) = image.claim_for(invocation) {
            self.ctx.image_repo().set_server(image.id, server_id).await?;
            info!(image_id = image.id, server_id = %server_id, "Image claimed by server");
        }

        Ok(PictureResponse {
            collection: collection.name.to_string(),
            url: self.ctx.store().public_url(&image.object_key()),
            storage_key: image.storage_key,
        })
    }

    /// Remove a picture; the image owner or the moderator only
    ///
    /// The collection is deleted together with its last image.
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn remove_picture(
        &self,
        request: RemovePictureRequest,
        actor: &Invocation,
    ) -> ServiceResult<()> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let collection = self.resolve(&request.collection).await?;
        let image = self
            .ctx
            .image_repo()
            .find_by_key(&collection, &request.storage_key)
            .await?
            .ok_or_else(|| DomainError::ImageNotFound {
                collection: collection.to_string(),
                key: request.storage_key.clone(),
            })?;

        if image.user_id != actor.user_id && !self.ctx.is_moderator(actor.user_id) {
            return Err(DomainError::NotImageOwner.into());
        }

        self.ctx.store().delete(&image.object_key()).await?;
        self.ctx.image_repo().delete(image.id).await?;
        info!(collection = %collection, storage_key = %image.storage_key, "Image removed");

        if self.ctx.image_repo().count(&collection).await? == 0 {
            self.ctx.collection_repo().delete(&collection).await?;
            info!(collection = %collection, "Empty collection deleted");
        }
        Ok(())
    }

    /// Collections the invoker may see, with their image counts
    #[instrument(skip(self, invocation), fields(user_id = %invocation.user_id))]
    pub async fn list_collections(
        &self,
        invocation: &Invocation,
    ) -> ServiceResult<Vec<CollectionListing>> {
        let summaries = self.ctx.collection_repo().list_summaries().await?;

        let mut listings = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let Some(collection) = self.ctx.collection_repo().find_by_name(&summary.name).await?
            else {
                continue;
            };
            let servers = self.ctx.association_repo().find_servers(&summary.name).await?;
            if collection.is_visible_to(&servers, invocation) {
                listings.push(CollectionListing::from(summary));
            }
        }
        Ok(listings)
    }

    /// Create an alias for an existing collection
    #[instrument(skip(self, request, actor), fields(user_id = %actor.user_id))]
    pub async fn add_alias(&self, request: CreateAliasRequest, actor: &Invocation) -> ServiceResult<()> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let alias = CollectionName::parse(&request.alias).map_err(DomainError::from)?;
        let target_name = self.resolve(&request.target).await?;
        let target = self.existing_collection(&target_name).await?;
        self.ensure_can_manage(&target, actor)?;

        if self.ctx.collection_repo().find_by_name(&alias).await?.is_some()
            || self.ctx.alias_repo().resolve(&alias).await?.is_some()
        {
            return Err(DomainError::NameTaken(alias.to_string()).into());
        }

        self.ctx
            .alias_repo()
            .create(&Alias {
                alias: alias.clone(),
                target: target.name,
            })
            .await?;
        info!(alias = %alias, target = %target_name, "Alias created");
        Ok(())
    }

    /// Delete an alias
    #[instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn remove_alias(&self, alias: &str, actor: &Invocation) -> ServiceResult<()> {
        let alias = CollectionName::parse(alias).map_err(DomainError::from)?;
        let target_name = self
            .ctx
            .alias_repo()
            .resolve(&alias)
            .await?
            .ok_or_else(|| DomainError::AliasNotFound(alias.to_string()))?;
        let target = self.existing_collection(&target_name).await?;
        self.ensure_can_manage(&target, actor)?;

        if !self.ctx.alias_repo().delete(&alias).await? {
            return Err(DomainError::AliasNotFound(alias.to_string()).into());
        }
        info!(alias = %alias, "Alias removed");
        Ok(())
    }

    async fn existing_collection(&self, name: &CollectionName) -> ServiceResult<MediaCollection> {
        self.ctx
            .collection_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::CollectionNotFound(name.to_string()).into())
    }

    /// Resolve a collection, hiding the ones the invoker may not see
    async fn visible_collection(
        &self,
        name: &str,
        invocation: &Invocation,
    ) -> ServiceResult<MediaCollection> {
        let name = self.resolve(name).await?;
        let collection = self.existing_collection(&name).await?;
        let servers = self.ctx.association_repo().find_servers(&name).await?;

        if !collection.is_visible_to(&servers, invocation) {
            return Err(DomainError::CollectionNotFound(name.to_string()).into());
        }
        Ok(collection)
    }

    fn ensure_can_manage(&self, collection: &MediaCollection, actor: &Invocation) -> ServiceResult<()> {
        if collection.is_owner(actor.user_id) || self.ctx.is_moderator(actor.user_id) {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(
                "only the collection owner or the moderator can manage its aliases",
            ))
        }
    }
}
