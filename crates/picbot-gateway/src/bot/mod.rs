//! Bot setup
//!
//! Wires the database, object store, media fetcher and chat platform clients
//! into a service context, then runs the gateway session and event router.

use std::sync::Arc;

use picbot_common::{AppConfig, AppError};
use picbot_service::{ApprovalRegistry, ServiceContext, ServiceContextBuilder, ServiceSettings};
use picbot_storage::{HttpMediaFetcher, S3ObjectStore};
use tokio::sync::mpsc;

use crate::connection::GatewayClient;
use crate::handlers::{CommandHandler, EventRouter};
use crate::rest::RestClient;

/// Dispatch events buffered between the socket and the router
const EVENT_BUFFER: usize = 256;

/// Initialize all dependencies and build the service context
pub async fn create_service_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let pool = picbot_db::create_pool(&picbot_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    picbot_db::run_migrations(&pool)
        .await
        .map_err(|e| AppError::Migration(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let store = S3ObjectStore::from_config(&config.storage).await;
    tracing::info!(bucket = %store.bucket(), "Object store configured");

    let fetcher =
        HttpMediaFetcher::new(config.media.clone()).map_err(|e| AppError::Storage(e.to_string()))?;
    let rest = RestClient::from_config(&config.bot).map_err(AppError::gateway)?;

    ServiceContextBuilder::new()
        .collection_repo(Arc::new(picbot_db::PgCollectionRepository::new(pool.clone())))
        .image_repo(Arc::new(picbot_db::PgImageRepository::new(pool.clone())))
        .association_repo(Arc::new(picbot_db::PgServerAssociationRepository::new(pool.clone())))
        .alias_repo(Arc::new(picbot_db::PgAliasRepository::new(pool)))
        .gateway(Arc::new(rest))
        .store(Arc::new(store))
        .fetcher(Arc::new(fetcher))
        .registry(Arc::new(ApprovalRegistry::new()))
        .settings(ServiceSettings::from_config(config))
        .build()
        .map_err(AppError::from)
}

/// Run the bot until the platform refuses the session or Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let ctx = Arc::new(create_service_context(&config).await?);

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let client = GatewayClient::from_config(&config.bot, events_tx);
    let router = EventRouter::new(
        CommandHandler::new(Arc::clone(&ctx), config.bot.command_prefix.as_str()),
        Arc::clone(ctx.registry()),
    );
    let router_task = tokio::spawn(router.run(events_rx));

    tracing::info!(gateway = %config.bot.gateway_url, "Connecting to gateway");
    let result = tokio::select! {
        result = client.run() => result.map_err(AppError::gateway),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    router_task.abort();
    if !ctx.registry().is_empty() {
        tracing::warn!(
            pending = ?ctx.registry().pending(),
            "Exiting with approval requests still pending"
        );
    }
    result
}
