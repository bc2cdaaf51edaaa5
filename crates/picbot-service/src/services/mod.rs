//! Business logic services
//!
//! The submission pipeline (intake, duplicate check, approval, commit) and
//! the picture commands, all working against the ports in [`ServiceContext`].

pub mod approval;
pub mod commit;
pub mod context;
pub mod duplicate;
pub mod error;
pub mod intake;
pub mod picture;
pub mod picture_adder;
pub mod registry;

// Re-export all services for convenience
pub use approval::ApprovalService;
pub use commit::CommitService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use duplicate::DuplicateCheck;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use intake::{content_hash, IntakeService, Submission};
pub use picture::PictureService;
pub use picture_adder::PictureAdder;
pub use registry::{ApprovalRegistry, PendingApproval};
