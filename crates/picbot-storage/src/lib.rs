//! # picbot-storage
//!
//! Media infrastructure: the S3 object store, the HTTP media fetcher with
//! scoped scratch directories, and ffmpeg transcoding.

pub mod error;
pub mod fetcher;
pub mod s3;
pub mod scratch;
pub mod transcode;

pub use error::StorageError;
pub use fetcher::{HttpMediaFetcher, MediaKind};
pub use s3::S3ObjectStore;
pub use scratch::ScratchDir;
pub use transcode::Transcoder;
