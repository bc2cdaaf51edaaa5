//! Image entity - one approved picture within a collection

use chrono::{DateTime, Utc};

use crate::value_objects::{CollectionName, ContentHash, Snowflake};

/// Prefix under which every collection's objects are stored
pub const STORAGE_ROOT: &str = "pictures";

/// Image entity (a row of the `images` table)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: i64,
    pub collection: CollectionName,
    pub storage_key: String,
    pub content_hash: ContentHash,
    pub user_id: Snowflake,
    pub server_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl MediaItem {
    /// Object store key for this image
    pub fn object_key(&self) -> String {
        object_key(&self.collection, &self.storage_key)
    }

    /// Whether an invocation may be shown this image
    pub fn is_visible_to(&self, invocation: &Invocation) -> bool {
        match self.server_id {
            None => true,
            Some(server_id) => {
                invocation.server_id == Some(server_id) || invocation.user_id == self.user_id
            }
        }
    }

    /// Server that should claim this image when it is shown
    ///
    /// Images submitted outside a server carry no server until they are first
    /// used inside one.
    pub fn claim_for(&self, invocation: &Invocation) -> Option<Snowflake> {
        match (self.server_id, invocation.server_id) {
            (None, Some(server_id)) => Some(server_id),
            _ => None,
        }
    }
}

/// Values for inserting a freshly approved image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaItem {
    pub collection: CollectionName,
    pub storage_key: String,
    pub content_hash: ContentHash,
    pub user_id: Snowflake,
    pub server_id: Option<Snowflake>,
}

/// Where a command was invoked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` in direct messages
    pub server_id: Option<Snowflake>,
}

impl Invocation {
    pub fn new(user_id: Snowflake, channel_id: Snowflake, server_id: Option<Snowflake>) -> Self {
        Self {
            user_id,
            channel_id,
            server_id,
        }
    }

    /// Invocation inside a server channel
    pub fn in_server(user_id: i64, channel_id: i64, server_id: i64) -> Self {
        Self::new(
            Snowflake::new(user_id),
            Snowflake::new(channel_id),
            Some(Snowflake::new(server_id)),
        )
    }

    /// Invocation from a direct message channel
    pub fn direct(user_id: i64, channel_id: i64) -> Self {
        Self::new(Snowflake::new(user_id), Snowflake::new(channel_id), None)
    }
}

/// Object store key `pictures/<collection>/<storage_key>`
pub fn object_key(collection: &CollectionName, storage_key: &str) -> String {
    format!("{STORAGE_ROOT}/{collection}/{storage_key}")
}

/// Storage key candidate for a file name
///
/// `attempt` `None` keeps the literal name; `Some(n)` inserts `n` before the
/// extension (`cat.png` → `cat0.png`).
pub fn storage_key_candidate(file_name: &str, attempt: Option<u32>) -> String {
    let Some(n) = attempt else {
        return file_name.to_string();
    };
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}{n}.{ext}"),
        _ => format!("{file_name}{n}"),
    }
}

/// Reduce an arbitrary file name to a safe storage key
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
