//! Content hash - MD5 digest used for duplicate detection

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowercase hex MD5 digest of a file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Hex length of an MD5 digest
    pub const HEX_LEN: usize = 32;

    /// Build from a hex string, normalizing to lowercase
    pub fn from_hex(hex: &str) -> Result<Self, ContentHashError> {
        if hex.len() != Self::HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ContentHashError(hex.to_string()));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Build from a raw 16-byte digest
    pub fn from_digest(digest: [u8; 16]) -> Self {
        let mut hex = String::with_capacity(Self::HEX_LEN);
        for byte in digest {
            hex.push_str(&format!("{byte:02x}"));
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ContentHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

/// Rejected hash string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MD5 hex digest: {0}")]
pub struct ContentHashError(pub String);
