//! Value objects - immutable types that represent domain concepts

mod collection_name;
mod content_hash;
mod snowflake;

pub use collection_name::{CollectionName, CollectionNameError};
pub use content_hash::{ContentHash, ContentHashError};
pub use snowflake::{Snowflake, SnowflakeParseError};
