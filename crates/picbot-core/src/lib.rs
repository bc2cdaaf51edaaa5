//! # picbot-core
//!
//! Domain layer containing entities, value objects, the approval decision rule,
//! and the repository and service ports.
//! This crate has zero dependencies on infrastructure (database, HTTP, object store).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Alias, ApprovalDecision, Attachment, CollectionState, CollectionSummary, DecisionState,
    Invocation, MediaCollection, MediaItem, NewMediaItem, PendingSubmission, ReactionCount,
    ReactionTally, SubmissionSource, APPROVE_EMOJI, REJECT_EMOJI,
};
pub use error::DomainError;
pub use traits::{
    AliasRepository, ChatGateway, CollectionRepository, FetchedMedia, ImageRepository,
    MediaFetcher, ObjectStore, PortResult, RepoResult, ServerAssociationRepository, TempScope,
};
pub use value_objects::{
    CollectionName, CollectionNameError, ContentHash, ContentHashError, Snowflake,
    SnowflakeParseError,
};
