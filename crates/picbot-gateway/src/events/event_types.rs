//! Dispatch event names the bot reacts to

use std::fmt;

/// Gateway event types the bot handles
///
/// Everything else the platform dispatches is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// Sent after a successful Identify
    Ready,
    /// New message
    MessageCreate,
    /// Reaction added
    MessageReactionAdd,
    /// Reaction removed
    MessageReactionRemove,
}

impl GatewayEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
        }
    }

    /// Parse the `t` field of a dispatch frame
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "MESSAGE_CREATE" => Some(Self::MessageCreate),
            "MESSAGE_REACTION_ADD" => Some(Self::MessageReactionAdd),
            "MESSAGE_REACTION_REMOVE" => Some(Self::MessageReactionRemove),
            _ => None,
        }
    }

    /// Reaction changes can settle a pending approval
    #[must_use]
    pub const fn is_reaction(self) -> bool {
        matches!(self, Self::MessageReactionAdd | Self::MessageReactionRemove)
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
