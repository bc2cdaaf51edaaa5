//! Reaction state on an approval message and the moderator decision rule

use serde::{Deserialize, Serialize};

/// Emoji the moderator uses to approve a submission
pub const APPROVE_EMOJI: &str = "✅";

/// Emoji the moderator uses to reject a submission
pub const REJECT_EMOJI: &str = "❌";

/// Participant count of a decided reaction: the bot's seed plus the moderator
pub const DECIDED_COUNT: i64 = 2;

/// Aggregated reaction count, as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: i64,
    pub me: bool,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(emoji: impl Into<String>, count: i64, me: bool) -> Self {
        Self {
            emoji: emoji.into(),
            count,
            me,
        }
    }

    /// The decision this reaction stands for, if it is a decision emoji
    pub fn decision(&self) -> Option<ApprovalDecision> {
        match self.emoji.as_str() {
            APPROVE_EMOJI => Some(ApprovalDecision::Approved),
            REJECT_EMOJI => Some(ApprovalDecision::Rejected),
            _ => None,
        }
    }

    /// Both the bot and the moderator have reacted with this emoji
    #[inline]
    pub fn is_decided(&self) -> bool {
        self.count == DECIDED_COUNT
    }
}

/// Moderator verdict on a pending submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl ApprovalDecision {
    #[inline]
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Reading of an approval message's reactions at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    /// No decision emoji carries the moderator's reaction yet
    Undecided,
    /// Exactly one decision emoji is at the decided count
    Decided(ApprovalDecision),
    /// The moderator reacted with both emoji
    Ambiguous,
}

/// Applies the decision rule to a message's reaction list
pub struct ReactionTally;

impl ReactionTally {
    /// Evaluate the reaction state of an approval message
    ///
    /// Only decision emoji whose count equals [`DECIDED_COUNT`] qualify. One
    /// qualifying reaction is a decision; more than one is ambiguous.
    pub fn evaluate(reactions: &[ReactionCount]) -> DecisionState {
        let mut qualifying = reactions
            .iter()
            .filter(|r| r.is_decided())
            .filter_map(ReactionCount::decision);

        match (qualifying.next(), qualifying.next()) {
            (None, _) => DecisionState::Undecided,
            (Some(decision), None) => DecisionState::Decided(decision),
            (Some(_), Some(_)) => DecisionState::Ambiguous,
        }
    }
}
