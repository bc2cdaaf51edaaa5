//! Service layer error types
//!
//! Provides a unified error type for all service operations, and the
//! classification the submission flow uses to decide who hears about a failure.

use picbot_common::AppError;
use picbot_core::{DomainError, Snowflake};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or infrastructure failure
    Domain(DomainError),

    /// Permission denied
    PermissionDenied(String),

    /// Validation error
    Validation(String),

    /// The moderator reacted with both decision emoji
    Ambiguous { request_id: Snowflake },

    /// Internal error
    Internal(String),
}

/// How a failure is handled in a submission flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, reported to the invoking user
    UserError,
    /// Network or platform hiccup, retried with backoff
    Transient,
    /// Double reaction, reported to the moderator while waiting continues
    Ambiguous,
    /// Anything else, reported to submitter and moderator
    Fatal,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::PermissionDenied(msg) => write!(f, "Permission denied: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Ambiguous { request_id } => write!(
                f,
                "Request {request_id} has both approve and reject reactions; remove one"
            ),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify this error for the submission flow
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => {
                if e.is_transient() {
                    ErrorKind::Transient
                } else if e.is_not_found()
                    || e.is_validation()
                    || e.is_authorization()
                    || e.is_conflict()
                {
                    ErrorKind::UserError
                } else {
                    ErrorKind::Fatal
                }
            }
            Self::PermissionDenied(_) | Self::Validation(_) => ErrorKind::UserError,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::Internal(_) => ErrorKind::Fatal,
        }
    }

    /// Check if the content already exists in the target collection
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Domain(DomainError::DuplicateContent(_)))
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::PermissionDenied(_) => "MISSING_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Ambiguous { .. } => "AMBIGUOUS_DECISION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            other => AppError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
