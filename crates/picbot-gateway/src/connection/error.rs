//! Gateway connection errors

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("connection closed by platform ({code}): {reason}")]
    Closed { code: u16, reason: String },

    #[error("connection dropped")]
    Disconnected,

    #[error("no Hello received")]
    HelloTimeout,
}

impl GatewayError {
    /// Whether reconnecting can help
    pub fn should_reconnect(&self) -> bool {
        match self {
            Self::Closed { code, .. } => {
                CloseCode::from_u16(*code).map_or(true, CloseCode::should_reconnect)
            }
            _ => true,
        }
    }
}
