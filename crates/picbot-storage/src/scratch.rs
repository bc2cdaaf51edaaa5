//! Scoped temporary directories for downloads

use std::path::Path;

use picbot_core::traits::TempScope;
use tempfile::TempDir;

use crate::error::StorageError;

/// A temporary directory owned by one submission flow
///
/// Removed together with its contents when dropped.
#[derive(Debug)]
pub struct ScratchDir(TempDir);

impl ScratchDir {
    pub fn new() -> Result<Self, StorageError> {
        let dir = tempfile::Builder::new().prefix("picbot-").tempdir()?;
        Ok(Self(dir))
    }
}

impl TempScope for ScratchDir {
    fn path(&self) -> &Path {
        self.0.path()
    }
}
