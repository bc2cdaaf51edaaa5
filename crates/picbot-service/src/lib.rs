//! # picbot-service
//!
//! Application layer: the submission pipeline, picture commands and DTOs.

pub mod dto;
pub mod services;

pub use dto::*;
pub use services::*;
