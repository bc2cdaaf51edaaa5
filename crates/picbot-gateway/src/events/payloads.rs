//! Dispatch event payloads

use picbot_core::entities::{Attachment, Invocation};
use picbot_core::Snowflake;
use serde::{Deserialize, Serialize};

/// READY event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// The bot's own user
    pub user: UserPayload,
    pub session_id: String,
}

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// Absent for direct messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

impl MessageCreateEvent {
    /// Who sent the message, and from where
    #[must_use]
    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.author.id, self.channel_id, self.guild_id)
    }

    /// Attachments as domain values
    #[must_use]
    pub fn domain_attachments(&self) -> Vec<Attachment> {
        self.attachments.iter().cloned().map(Attachment::from).collect()
    }
}

/// Attachment data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub id: Snowflake,
    pub filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl From<AttachmentPayload> for Attachment {
    fn from(payload: AttachmentPayload) -> Self {
        Self {
            filename: payload.filename,
            url: payload.url,
            content_type: payload.content_type,
        }
    }
}

/// MESSAGE_REACTION_ADD/REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReactionEvent {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub emoji: String,
}
