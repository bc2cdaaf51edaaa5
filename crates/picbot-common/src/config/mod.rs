//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ApprovalConfig, BotConfig, ConfigError, DatabaseConfig, Environment,
    MediaConfig, ModeratorConfig, StorageConfig,
};
