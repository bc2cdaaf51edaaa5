//! HTTP media fetcher
//!
//! Downloads a submission into its own scratch directory, checks that it is
//! an image or video, and shrinks it when it exceeds the upload budget.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use picbot_common::MediaConfig;
use picbot_core::entities::sanitize_file_name;
use picbot_core::traits::{FetchedMedia, MediaFetcher, PortResult, TempScope};
use tracing::{info, instrument};

use crate::error::StorageError;
use crate::scratch::ScratchDir;
use crate::transcode::Transcoder;

/// Broad media class detected from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Sniff the media class and canonical extension from file contents
    pub fn sniff(bytes: &[u8]) -> Result<(Self, &'static str), StorageError> {
        let Some(kind) = infer::get(bytes) else {
            return Err(StorageError::Unsupported("unknown".to_string()));
        };
        match kind.matcher_type() {
            infer::MatcherType::Image => Ok((Self::Image, kind.extension())),
            infer::MatcherType::Video => Ok((Self::Video, kind.extension())),
            _ => Err(StorageError::Unsupported(kind.mime_type().to_string())),
        }
    }

    #[inline]
    pub fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }
}

/// Downloads media over HTTP(S) with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
    transcoder: Transcoder,
    config: MediaConfig,
}

impl HttpMediaFetcher {
    pub fn new(config: MediaConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(config.download_timeout())
            .user_agent(concat!("picbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::Client(e.to_string()))?;

        Ok(Self {
            client,
            transcoder: Transcoder::new(&config.ffmpeg_path),
            config,
        })
    }

    /// Download the body, refusing anything above the download cap
    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let max = self.config.max_download_bytes();
        let too_large = StorageError::TooLarge {
            max_mb: self.config.max_download_mb,
        };

        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::BadStatus(status.as_u16()));
        }
        if response.content_length().is_some_and(|len| len > max) {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > max {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Bring an oversized file under the upload budget
    ///
    /// Only video is transcoded. Oversized images are kept as they are and
    /// fail the final size check.
    async fn fit_upload_budget(
        &self,
        path: PathBuf,
        bytes: Vec<u8>,
        kind: MediaKind,
    ) -> Result<(PathBuf, Vec<u8>), StorageError> {
        let budget = self.config.max_upload_bytes();
        if bytes.len() as u64 <= budget {
            return Ok((path, bytes));
        }
        let too_large = StorageError::TooLarge {
            max_mb: self.config.max_upload_mb,
        };
        if !kind.is_video() {
            return Err(too_large);
        }

        let out = self.transcoder.shrink_video(&path).await?;
        let shrunk = tokio::fs::read(&out).await?;
        info!(before = bytes.len(), after = shrunk.len(), "transcoded oversized video");

        if shrunk.len() as u64 > budget {
            return Err(too_large);
        }
        Ok((out, shrunk))
    }

    async fn fetch_inner(
        &self,
        url: &str,
        file_name: Option<&str>,
    ) -> Result<FetchedMedia, StorageError> {
        let bytes = self.download(url).await?;
        let (kind, extension) = MediaKind::sniff(&bytes)?;

        let name = file_name
            .map(str::to_string)
            .or_else(|| file_name_from_url(url))
            .unwrap_or_default();
        let name = with_extension(&sanitize_file_name(&name), extension);

        let scope = ScratchDir::new()?;
        let path = scope.path().join(&name);
        tokio::fs::write(&path, &bytes).await?;

        let (path, bytes) = self.fit_upload_budget(path, bytes, kind).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(name, str::to_string);

        Ok(FetchedMedia {
            bytes,
            path,
            file_name,
            scope: Box::new(scope),
        })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str, file_name: Option<&str>) -> PortResult<FetchedMedia> {
        Ok(self.fetch_inner(url, file_name).await?)
    }
}

/// Last path segment of a URL, if any
fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    (!last.is_empty()).then(|| last.to_string())
}

/// Ensure the name carries an extension, using the sniffed one if missing
fn with_extension(name: &str, extension: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}
