//! Storage error types

use picbot_core::error::DomainError;

/// Errors raised by the object store, fetcher and transcoder
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server answered {0}")]
    BadStatus(u16),

    #[error("unsupported media type: {0}")]
    Unsupported(String),

    #[error("file exceeds {max_mb} MB")]
    TooLarge { max_mb: u64 },

    #[error("transcoding failed: {0}")]
    Transcode(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::BadStatus(status.as_u16()),
            None => Self::Request(err.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Request(_) | StorageError::BadStatus(_) => {
                DomainError::DownloadFailed(err.to_string())
            }
            StorageError::Unsupported(mime) => DomainError::UnsupportedMedia(mime),
            StorageError::TooLarge { max_mb } => DomainError::MediaTooLarge { max_mb },
            StorageError::Transcode(msg) => DomainError::TranscodeFailed(msg),
            StorageError::Upload(_) | StorageError::Delete(_) => {
                DomainError::StorageError(err.to_string())
            }
            StorageError::Io(_) | StorageError::Client(_) => {
                DomainError::InternalError(err.to_string())
            }
        }
    }
}
