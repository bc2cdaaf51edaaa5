//! Payloads of the non-dispatch gateway frames

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Interval assumed when the platform omits one (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    /// The advertised interval, never zero
    #[must_use]
    pub fn interval(&self) -> std::time::Duration {
        let ms = if self.heartbeat_interval == 0 {
            Self::DEFAULT_HEARTBEAT_INTERVAL
        } else {
            self.heartbeat_interval
        };
        std::time::Duration::from_millis(ms)
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Authentication token (`Bearer <token>`)
    pub token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IdentifyProperties>,
}

impl IdentifyPayload {
    /// Identify as a bot with the given raw token
    #[must_use]
    pub fn bot(token: &str) -> Self {
        Self {
            token: format!("Bearer {token}"),
            properties: Some(IdentifyProperties::current()),
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl IdentifyProperties {
    /// Properties describing this process
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: Some(std::env::consts::OS.to_string()),
            browser: Some(env!("CARGO_PKG_NAME").to_string()),
            device: Some(env!("CARGO_PKG_NAME").to_string()),
        }
    }
}
