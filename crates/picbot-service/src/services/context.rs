//! Service context - dependency container for services
//!
//! Holds all repositories, external service ports and shared state needed by services.

use std::sync::Arc;

use picbot_common::{AppConfig, ApprovalConfig};
use picbot_core::traits::{
    AliasRepository, ChatGateway, CollectionRepository, ImageRepository, MediaFetcher,
    ObjectStore, ServerAssociationRepository,
};
use picbot_core::Snowflake;

use super::error::{ServiceError, ServiceResult};
use super::registry::ApprovalRegistry;

/// Runtime settings the services read
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// The user who approves submissions
    pub moderator_id: Snowflake,
    pub approval: ApprovalConfig,
}

impl ServiceSettings {
    pub fn new(moderator_id: Snowflake) -> Self {
        Self {
            moderator_id,
            approval: ApprovalConfig::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            moderator_id: Snowflake::new(config.moderator.user_id),
            approval: config.approval,
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The chat platform, object store and media fetcher ports
/// - The approval registry shared with the gateway's event handler
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    collection_repo: Arc<dyn CollectionRepository>,
    image_repo: Arc<dyn ImageRepository>,
    association_repo: Arc<dyn ServerAssociationRepository>,
    alias_repo: Arc<dyn AliasRepository>,

    // External services
    gateway: Arc<dyn ChatGateway>,
    store: Arc<dyn ObjectStore>,
    fetcher: Arc<dyn MediaFetcher>,

    // Shared state
    registry: Arc<ApprovalRegistry>,
    settings: ServiceSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection_repo: Arc<dyn CollectionRepository>,
        image_repo: Arc<dyn ImageRepository>,
        association_repo: Arc<dyn ServerAssociationRepository>,
        alias_repo: Arc<dyn AliasRepository>,
        gateway: Arc<dyn ChatGateway>,
        store: Arc<dyn ObjectStore>,
        fetcher: Arc<dyn MediaFetcher>,
        registry: Arc<ApprovalRegistry>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            collection_repo,
            image_repo,
            association_repo,
            alias_repo,
            gateway,
            store,
            fetcher,
            registry,
            settings,
        }
    }

    // === Repositories ===

    /// Get the collection repository
    pub fn collection_repo(&self) -> &dyn CollectionRepository {
        self.collection_repo.as_ref()
    }

    /// Get the image repository
    pub fn image_repo(&self) -> &dyn ImageRepository {
        self.image_repo.as_ref()
    }

    /// Get the server association repository
    pub fn association_repo(&self) -> &dyn ServerAssociationRepository {
        self.association_repo.as_ref()
    }

    /// Get the alias repository
    pub fn alias_repo(&self) -> &dyn AliasRepository {
        self.alias_repo.as_ref()
    }

    // === External Services ===

    /// Get the chat platform client
    pub fn gateway(&self) -> &dyn ChatGateway {
        self.gateway.as_ref()
    }

    /// Get the object store
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Get the media fetcher
    pub fn fetcher(&self) -> &dyn MediaFetcher {
        self.fetcher.as_ref()
    }

    // === Shared State ===

    /// Get the approval registry
    pub fn registry(&self) -> &Arc<ApprovalRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Check if the user is the moderator
    pub fn is_moderator(&self, user_id: Snowflake) -> bool {
        self.settings.moderator_id == user_id
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("ports", &"...")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    collection_repo: Option<Arc<dyn CollectionRepository>>,
    image_repo: Option<Arc<dyn ImageRepository>>,
    association_repo: Option<Arc<dyn ServerAssociationRepository>>,
    alias_repo: Option<Arc<dyn AliasRepository>>,
    gateway: Option<Arc<dyn ChatGateway>>,
    store: Option<Arc<dyn ObjectStore>>,
    fetcher: Option<Arc<dyn MediaFetcher>>,
    registry: Option<Arc<ApprovalRegistry>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection_repo(mut self, repo: Arc<dyn CollectionRepository>) -> Self {
        self.collection_repo = Some(repo);
        self
    }

    pub fn image_repo(mut self, repo: Arc<dyn ImageRepository>) -> Self {
        self.image_repo = Some(repo);
        self
    }

    pub fn association_repo(mut self, repo: Arc<dyn ServerAssociationRepository>) -> Self {
        self.association_repo = Some(repo);
        self
    }

    pub fn alias_repo(mut self, repo: Arc<dyn AliasRepository>) -> Self {
        self.alias_repo = Some(repo);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn ChatGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn MediaFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Share an existing registry; a fresh one is created otherwise
    pub fn registry(mut self, registry: Arc<ApprovalRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.collection_repo
                .ok_or_else(|| ServiceError::validation("collection_repo is required"))?,
            self.image_repo
                .ok_or_else(|| ServiceError::validation("image_repo is required"))?,
            self.association_repo
                .ok_or_else(|| ServiceError::validation("association_repo is required"))?,
            self.alias_repo
                .ok_or_else(|| ServiceError::validation("alias_repo is required"))?,
            self.gateway
                .ok_or_else(|| ServiceError::validation("gateway is required"))?,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.fetcher
                .ok_or_else(|| ServiceError::validation("fetcher is required"))?,
            self.registry.unwrap_or_default(),
            self.settings
                .ok_or_else(|| ServiceError::validation("settings are required"))?,
        ))
    }
}
