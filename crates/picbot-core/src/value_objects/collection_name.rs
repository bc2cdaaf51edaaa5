//! Collection name - the command-like key of a picture collection

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validated collection name
///
/// ASCII alphanumeric only, stored lowercased so `Cats` and `cats` address
/// the same collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Longest accepted name
    pub const MAX_LEN: usize = 32;

    /// Parse and normalize a user-supplied name
    pub fn parse(raw: &str) -> Result<Self, CollectionNameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CollectionNameError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(CollectionNameError::TooLong { max: Self::MAX_LEN });
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CollectionNameError::NotAlphanumeric(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Borrow the normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = CollectionNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

/// Reasons a collection name is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionNameError {
    #[error("collection name is empty")]
    Empty,

    #[error("collection name is longer than {max} characters")]
    TooLong { max: usize },

    #[error("collection name `{0}` must be ASCII letters and digits only")]
    NotAlphanumeric(String),
}
