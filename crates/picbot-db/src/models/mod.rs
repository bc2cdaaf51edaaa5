//! Database models - SQLx-compatible structs for PostgreSQL tables

mod collection;
mod image;

pub use collection::{CollectionModel, CollectionSummaryModel};
pub use image::ImageModel;
