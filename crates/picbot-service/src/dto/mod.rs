//! Data transfer objects for command requests and service responses
//!
//! This module provides:
//! - Request DTOs with validation for command inputs
//! - Response DTOs the bot renders back into chat

pub mod requests;
pub mod responses;

pub use requests::{CreateAliasRequest, RemovePictureRequest, SubmissionRequest};
pub use responses::{CollectionListing, CommittedImage, PictureResponse, SubmissionOutcome};
