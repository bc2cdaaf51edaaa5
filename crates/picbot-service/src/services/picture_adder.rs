//! PictureAdder - runs one `addpic` submission from download to commit
//!
//! Every flow ends in a [`SubmissionOutcome`] that is delivered as chat
//! messages; nothing is returned as an error to the command handler.

use std::sync::Arc;

use picbot_core::entities::Invocation;
use picbot_core::Snowflake;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::dto::{SubmissionOutcome, SubmissionRequest};

use super::approval::ApprovalService;
use super::commit::CommitService;
use super::context::ServiceContext;
use super::duplicate::DuplicateCheck;
use super::error::{ErrorKind, ServiceError, ServiceResult};
use super::intake::IntakeService;

/// Submission orchestrator
#[derive(Clone)]
pub struct PictureAdder {
    ctx: Arc<ServiceContext>,
}

impl PictureAdder {
    /// Create a new PictureAdder
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Run a submission on its own task
    pub fn spawn(&self, request: SubmissionRequest) -> JoinHandle<SubmissionOutcome> {
        let adder = self.clone();
        tokio::spawn(async move { adder.submit(request).await })
    }

    /// Run a submission to completion and report the outcome in chat
    #[instrument(skip(self, request), fields(collection = %request.collection, user_id = %request.submitter.user_id))]
    pub async fn submit(&self, request: SubmissionRequest) -> SubmissionOutcome {
        let submitter = request.submitter;

        let outcome = match self.run(request).await {
            Ok(outcome) => outcome,
            Err(e) => match e.kind() {
                ErrorKind::UserError => {
                    info!(code = e.error_code(), error = %e, "Submission refused");
                    SubmissionOutcome::UserError {
                        message: e.to_string(),
                    }
                }
                _ => {
                    error!(code = e.error_code(), error = %e, "Submission failed");
                    SubmissionOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            },
        };

        self.report(&submitter, &outcome).await;
        outcome
    }

    async fn run(&self, request: SubmissionRequest) -> ServiceResult<SubmissionOutcome> {
        let submission = IntakeService::new(&self.ctx).receive(request).await?;
        let collection = submission.collection.to_string();

        if DuplicateCheck::new(&self.ctx)
            .has_hash(&submission.collection, &submission.content_hash)
            .await?
        {
            return Ok(SubmissionOutcome::Duplicate { collection });
        }

        self.say(
            submission.submitter.channel_id,
            &format!(
                "{} your picture for `{collection}` is waiting for approval.",
                submission.submitter.user_id.mention()
            ),
        )
        .await;

        let approval = ApprovalService::new(&self.ctx);
        let pending = approval.request(&submission).await?;
        let decision = approval.await_decision(&pending).await?;
        drop(pending);

        if !decision.is_approved() {
            info!("Submission rejected");
            return Ok(SubmissionOutcome::Rejected { collection });
        }

        match CommitService::new(&self.ctx).commit(&submission).await {
            Ok(committed) => Ok(SubmissionOutcome::Added(committed)),
            Err(e) if e.is_duplicate() => Ok(SubmissionOutcome::Duplicate { collection }),
            Err(e) => Err(e),
        }
    }

    /// Deliver the outcome; failures also go to the moderator
    async fn report(&self, submitter: &Invocation, outcome: &SubmissionOutcome) {
        let text = outcome_message(submitter.user_id, outcome);
        self.say(submitter.channel_id, &text).await;

        if let SubmissionOutcome::Failed { .. } = outcome {
            match self.ctx.gateway().open_dm(self.ctx.settings().moderator_id).await {
                Ok(channel_id) => self.say(channel_id, &text).await,
                Err(e) => warn!(error = %e, "could not reach the moderator"),
            }
        }
    }

    async fn say(&self, channel_id: Snowflake, content: &str) {
        if let Err(e) = self.ctx.gateway().send_message(channel_id, content).await {
            warn!(channel_id = %channel_id, error = %ServiceError::from(e), "could not send message");
        }
    }
}

impl std::fmt::Debug for PictureAdder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureAdder").finish_non_exhaustive()
    }
}

fn outcome_message(user_id: Snowflake, outcome: &SubmissionOutcome) -> String {
    let mention = user_id.mention();
    match outcome {
        SubmissionOutcome::Added(image) if image.created_collection => format!(
            "{mention} created `{}` with `{}`: {}",
            image.collection, image.storage_key, image.url
        ),
        SubmissionOutcome::Added(image) => format!(
            "{mention} added `{}` to `{}`: {}",
            image.storage_key, image.collection, image.url
        ),
        SubmissionOutcome::Duplicate { collection } => {
            format!("{mention} that picture is already in `{collection}`.")
        }
        SubmissionOutcome::Rejected { collection } => {
            format!("{mention} your picture for `{collection}` was rejected.")
        }
        SubmissionOutcome::UserError { message } => format!("{mention} {message}"),
        SubmissionOutcome::Failed { message } => {
            format!("{mention} something went wrong adding your picture: {message}")
        }
    }
}
