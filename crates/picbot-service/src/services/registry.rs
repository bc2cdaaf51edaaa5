//! Approval registry - the set of approval requests still waiting on the moderator
//!
//! Shared by every submission flow and by the gateway's reaction event
//! handler. Each entry carries a [`Notify`] so a reaction event wakes exactly
//! the flow waiting on that message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use picbot_core::entities::PendingSubmission;
use picbot_core::Snowflake;
use tokio::sync::Notify;
use tracing::debug;

struct Entry {
    seq: u64,
    notify: Arc<Notify>,
}

/// In-flight approval requests keyed by approval message id
#[derive(Default)]
pub struct ApprovalRegistry {
    entries: DashMap<Snowflake, Entry>,
    next_seq: AtomicU64,
}

impl ApprovalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a posted approval request
    ///
    /// The entry lives as long as the returned guard.
    pub fn register(self: &Arc<Self>, submission: PendingSubmission) -> PendingApproval {
        let notify = Arc::new(Notify::new());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            submission.request_id,
            Entry {
                seq,
                notify: Arc::clone(&notify),
            },
        );
        debug!(request_id = %submission.request_id, seq, "approval request registered");

        PendingApproval {
            registry: Arc::clone(self),
            submission,
            notify,
        }
    }

    /// Wake the flow waiting on `message_id`
    ///
    /// Returns false when no request is pending for that message. A wakeup
    /// sent before the flow starts waiting is kept until it does.
    pub fn notify(&self, message_id: Snowflake) -> bool {
        match self.entries.get(&message_id) {
            Some(entry) => {
                entry.notify.notify_one();
                true
            }
            None => false,
        }
    }

    /// Pending request ids in the order they were registered
    pub fn pending(&self) -> Vec<Snowflake> {
        let mut ids: Vec<(u64, Snowflake)> = self
            .entries
            .iter()
            .map(|entry| (entry.value().seq, *entry.key()))
            .collect();
        ids.sort_unstable_by_key(|(seq, _)| *seq);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn contains(&self, message_id: Snowflake) -> bool {
        self.entries.contains_key(&message_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&self, message_id: Snowflake) {
        if self.entries.remove(&message_id).is_some() {
            debug!(request_id = %message_id, "approval request released");
        }
    }
}

impl std::fmt::Debug for ApprovalRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalRegistry")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Registration guard for one approval request
///
/// Dropping it (on decision, error or task cancellation) removes the request
/// from the registry.
pub struct PendingApproval {
    registry: Arc<ApprovalRegistry>,
    submission: PendingSubmission,
    notify: Arc<Notify>,
}

impl PendingApproval {
    pub fn request_id(&self) -> Snowflake {
        self.submission.request_id
    }

    pub fn channel_id(&self) -> Snowflake {
        self.submission.channel_id
    }

    pub fn submission(&self) -> &PendingSubmission {
        &self.submission
    }

    /// Wait for the next reaction event on this request's message
    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}

impl Drop for PendingApproval {
    fn drop(&mut self) {
        self.registry.remove(self.submission.request_id);
    }
}

impl std::fmt::Debug for PendingApproval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingApproval")
            .field("request_id", &self.submission.request_id)
            .field("collection", &self.submission.collection)
            .finish()
    }
}
