//! Entity to model mappers
//!
//! This module provides conversions between domain entities (picbot-core) and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects, re-validating names and hashes
//! - `*Insert` structs: Prepare entity data for database operations

mod collection;
mod image;

pub(crate) use collection::stored_name;
pub use collection::CollectionInsert;
pub use image::ImageInsert;
