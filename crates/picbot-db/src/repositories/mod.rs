//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in picbot-core.
//! Each repository handles database operations for one table.

mod alias;
mod association;
mod collection;
mod error;
mod image;

pub use alias::PgAliasRepository;
pub use association::PgServerAssociationRepository;
pub use collection::PgCollectionRepository;
pub use image::PgImageRepository;
