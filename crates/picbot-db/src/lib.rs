//! # picbot-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `picbot-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use picbot_db::{create_pool, run_migrations, DatabaseConfig, PgImageRepository};
//! use picbot_core::traits::ImageRepository;
//!
//! async fn example(url: String) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig { url, ..Default::default() };
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let image_repo = PgImageRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAliasRepository, PgCollectionRepository, PgImageRepository, PgServerAssociationRepository,
};
