//! Domain entities - core business objects

mod collection;
mod image;
mod reaction;
mod submission;

pub use collection::{Alias, CollectionState, CollectionSummary, MediaCollection};
pub use image::{
    object_key, sanitize_file_name, storage_key_candidate, Invocation, MediaItem, NewMediaItem,
    STORAGE_ROOT,
};
pub use reaction::{
    ApprovalDecision, DecisionState, ReactionCount, ReactionTally, APPROVE_EMOJI, DECIDED_COUNT,
    REJECT_EMOJI,
};
pub use submission::{Attachment, PendingSubmission, SubmissionSource};
