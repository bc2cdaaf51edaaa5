//! Collection entity - a named bucket of approved images

use chrono::{DateTime, Utc};

use crate::entities::Invocation;
use crate::value_objects::{CollectionName, Snowflake};

/// Collection entity (a row of the `commands` table)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCollection {
    pub name: CollectionName,
    pub owner_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl MediaCollection {
    /// Create a new collection owned by the first approved submitter
    pub fn new(name: CollectionName, owner_id: Option<Snowflake>) -> Self {
        Self {
            name,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Check if the user owns this collection
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Whether an invocation may see this collection
    ///
    /// `origin_servers` is the collection's server association set. A
    /// collection without associations is global. In DMs only global
    /// collections and the invoker's own collections are visible.
    pub fn is_visible_to(&self, origin_servers: &[Snowflake], invocation: &Invocation) -> bool {
        if origin_servers.is_empty() || self.is_owner(invocation.user_id) {
            return true;
        }
        match invocation.server_id {
            Some(server_id) => origin_servers.contains(&server_id),
            None => false,
        }
    }
}

/// Outcome of get-or-create on a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionState {
    Created(MediaCollection),
    Existing(MediaCollection),
}

impl CollectionState {
    pub fn collection(&self) -> &MediaCollection {
        match self {
            Self::Created(c) | Self::Existing(c) => c,
        }
    }

    #[inline]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Alternative name that resolves to an existing collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub alias: CollectionName,
    pub target: CollectionName,
}

/// Collection name with its image count, for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub name: CollectionName,
    pub image_count: i64,
}
