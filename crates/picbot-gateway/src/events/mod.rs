//! Gateway events
//!
//! The dispatch events the bot consumes.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    AttachmentPayload, MessageCreateEvent, MessageReactionEvent, ReadyEvent, UserPayload,
};
