//! REST request and response bodies

use picbot_core::entities::ReactionCount;
use picbot_core::Snowflake;
use serde::{Deserialize, Serialize};

/// Body of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageBody<'a> {
    pub content: &'a str,
}

/// Body of `POST /users/@me/channels`
#[derive(Debug, Clone, Serialize)]
pub struct CreateDmBody {
    pub recipient_id: Snowflake,
}

/// The parts of a message the bot reads back
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    pub id: Snowflake,
    #[serde(default)]
    pub reactions: Vec<ReactionBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionBody {
    pub emoji: String,
    pub count: i64,
    #[serde(default)]
    pub me: bool,
}

impl From<ReactionBody> for ReactionCount {
    fn from(body: ReactionBody) -> Self {
        ReactionCount::new(body.emoji, body.count, body.me)
    }
}

/// The parts of a channel the bot reads back
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelBody {
    pub id: Snowflake,
}
