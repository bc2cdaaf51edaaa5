//! REST client errors

use picbot_core::DomainError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("platform returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    #[error("could not read attachment: {0}")]
    Io(#[from] std::io::Error),
}

impl RestError {
    /// Whether the same call may succeed later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Endpoint(_) | Self::Io(_) => false,
        }
    }
}

impl From<RestError> for DomainError {
    fn from(err: RestError) -> Self {
        if err.is_transient() {
            DomainError::GatewayUnavailable(err.to_string())
        } else {
            DomainError::GatewayError(err.to_string())
        }
    }
}
