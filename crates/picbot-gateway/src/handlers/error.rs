//! Handler error types

use picbot_core::DomainError;
use picbot_service::{ErrorKind, ServiceError};
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Dispatch payload did not match the event type
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Whether the invoking user should see this error
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::InvalidPayload(_) => false,
            Self::Service(e) => e.kind() == ErrorKind::UserError,
        }
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        Self::Service(err.into())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
