//! Approval service
//!
//! Posts a submission to the moderator and waits for their reaction.

use chrono::Utc;
use picbot_core::entities::{
    ApprovalDecision, DecisionState, PendingSubmission, ReactionCount, ReactionTally,
    APPROVE_EMOJI, REJECT_EMOJI,
};
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::intake::Submission;
use super::registry::PendingApproval;

/// Approval service
pub struct ApprovalService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ApprovalService<'a> {
    /// Create a new ApprovalService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ask the moderator to approve a submission
    ///
    /// Posts the file to the moderator's DM, seeds the reject and approve
    /// reactions, and registers the request.
    #[instrument(skip(self, submission), fields(collection = %submission.collection))]
    pub async fn request(&self, submission: &Submission) -> ServiceResult<PendingApproval> {
        let gateway = self.ctx.gateway();
        let moderator = self.ctx.settings().moderator_id;

        let channel_id = gateway.open_dm(moderator).await?;
        let message_id = gateway
            .send_file(
                channel_id,
                &proposal_text(submission),
                &submission.media.path,
                &submission.media.file_name,
            )
            .await?;

        let pending = self.ctx.registry().register(PendingSubmission {
            request_id: message_id,
            channel_id,
            collection: submission.collection.clone(),
            submitter: submission.submitter,
            local_path: submission.media.path.clone(),
            file_name: submission.media.file_name.clone(),
            content_hash: submission.content_hash.clone(),
            created_at: Utc::now(),
        });

        gateway.add_reaction(channel_id, message_id, REJECT_EMOJI).await?;
        gateway.add_reaction(channel_id, message_id, APPROVE_EMOJI).await?;

        info!(request_id = %message_id, "Approval requested");
        Ok(pending)
    }

    /// Wait until the moderator decides
    ///
    /// Re-reads the reactions whenever a reaction event arrives for this
    /// message, and at least every recheck interval. Transient failures are
    /// retried after a fixed backoff. There is no overall timeout.
    #[instrument(skip(self, pending), fields(request_id = %pending.request_id()))]
    pub async fn await_decision(&self, pending: &PendingApproval) -> ServiceResult<ApprovalDecision> {
        let timing = self.ctx.settings().approval;
        let mut ambiguity_reported = false;

        loop {
            let reactions = match self.current_reactions(pending).await {
                Ok(reactions) => reactions,
                Err(e) if e.kind() == super::error::ErrorKind::Transient => {
                    warn!(error = %e, "reading reactions failed, retrying");
                    sleep(timing.retry_backoff()).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match ReactionTally::evaluate(&reactions) {
                DecisionState::Decided(decision) => {
                    info!(?decision, "Moderator decided");
                    return Ok(decision);
                }
                DecisionState::Ambiguous => {
                    if !ambiguity_reported {
                        self.report_ambiguity(pending).await;
                        ambiguity_reported = true;
                    }
                }
                DecisionState::Undecided => ambiguity_reported = false,
            }

            tokio::select! {
                () = pending.notified() => {}
                () = sleep(timing.recheck_interval()) => {}
            }
        }
    }

    async fn current_reactions(&self, pending: &PendingApproval) -> ServiceResult<Vec<ReactionCount>> {
        Ok(self
            .ctx
            .gateway()
            .get_reactions(pending.channel_id(), pending.request_id())
            .await?)
    }

    async fn report_ambiguity(&self, pending: &PendingApproval) {
        let err = ServiceError::Ambiguous {
            request_id: pending.request_id(),
        };
        warn!(error = %err, "Ambiguous decision");

        if let Err(e) = self
            .ctx
            .gateway()
            .send_message(pending.channel_id(), &err.to_string())
            .await
        {
            warn!(error = %e, "could not tell the moderator about the double reaction");
        }
    }
}

fn proposal_text(submission: &Submission) -> String {
    let origin = match submission.submitter.server_id {
        Some(server_id) => format!("server {server_id}"),
        None => "a direct message".to_string(),
    };
    format!(
        "{} wants to add `{}` to `{}` (from {origin}). React {APPROVE_EMOJI} to approve or {REJECT_EMOJI} to reject.",
        submission.submitter.user_id.mention(),
        submission.media.file_name,
        submission.collection,
    )
}
