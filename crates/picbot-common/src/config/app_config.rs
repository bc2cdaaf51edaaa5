//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub bot: BotConfig,
    pub moderator: ModeratorConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
    pub approval: ApprovalConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub token: String,
    /// REST base URL, e.g. `https://chat.example.com/api/v1`
    pub api_url: String,
    /// Gateway WebSocket URL
    pub gateway_url: String,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl BotConfig {
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// The single user who approves submissions
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModeratorConfig {
    pub user_id: i64,
}

/// Object store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Base URL objects are served from; defaults to the bucket's virtual-host URL
    #[serde(default)]
    pub public_url: Option<String>,
}

impl StorageConfig {
    /// Public base URL without trailing slash
    #[must_use]
    pub fn public_base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

/// Media download and transcoding limits
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_max_download_mb")]
    pub max_download_mb: u64,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

impl MediaConfig {
    /// Largest file the chat platform accepts for upload
    #[must_use]
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }

    /// Largest file the fetcher will download
    #[must_use]
    pub fn max_download_bytes(&self) -> u64 {
        self.max_download_mb * 1024 * 1024
    }

    #[must_use]
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: default_max_upload_mb(),
            max_download_mb: default_max_download_mb(),
            download_timeout_secs: default_download_timeout_secs(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

/// Approval waiter timing
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApprovalConfig {
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_recheck_secs")]
    pub recheck_secs: u64,
}

impl ApprovalConfig {
    /// Pause after a transient failure while reading reactions
    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Longest wait between two reaction reads without an event
    #[must_use]
    pub fn recheck_interval(&self) -> Duration {
        Duration::from_secs(self.recheck_secs)
    }
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: default_retry_backoff_ms(),
            recheck_secs: default_recheck_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "picbot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_max_upload_mb() -> u64 {
    8
}

fn default_max_download_mb() -> u64 {
    50
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_recheck_secs() -> u64 {
    30
}

/// Read a required variable
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Read an optional variable, failing on values that do not parse
fn parsed_or<T: FromStr>(name: &'static str, default: fn() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let moderator_raw = required("MODERATOR_ID")?;
        let moderator_id = moderator_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MODERATOR_ID", moderator_raw.clone()))?;

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            bot: BotConfig {
                token: required("BOT_TOKEN")?,
                api_url: required("BOT_API_URL")?,
                gateway_url: required("BOT_GATEWAY_URL")?,
                command_prefix: env::var("BOT_COMMAND_PREFIX")
                    .unwrap_or_else(|_| default_command_prefix()),
                reconnect_delay_ms: parsed_or("BOT_RECONNECT_DELAY_MS", default_reconnect_delay_ms)?,
            },
            moderator: ModeratorConfig {
                user_id: moderator_id,
            },
            storage: StorageConfig {
                bucket: required("S3_BUCKET")?,
                region: env::var("S3_REGION").unwrap_or_else(|_| default_region()),
                endpoint: env::var("S3_ENDPOINT").ok(),
                public_url: env::var("S3_PUBLIC_URL").ok(),
            },
            media: MediaConfig {
                max_upload_mb: parsed_or("MEDIA_MAX_UPLOAD_MB", default_max_upload_mb)?,
                max_download_mb: parsed_or("MEDIA_MAX_DOWNLOAD_MB", default_max_download_mb)?,
                download_timeout_secs: parsed_or(
                    "MEDIA_DOWNLOAD_TIMEOUT_SECS",
                    default_download_timeout_secs,
                )?,
                ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| default_ffmpeg_path()),
            },
            approval: ApprovalConfig {
                retry_backoff_ms: parsed_or("APPROVAL_RETRY_BACKOFF_MS", default_retry_backoff_ms)?,
                recheck_secs: parsed_or("APPROVAL_RECHECK_SECS", default_recheck_secs)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
