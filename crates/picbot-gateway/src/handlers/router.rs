//! Event router - fans dispatch events out to commands and the approval registry

use std::sync::Arc;

use picbot_service::ApprovalRegistry;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::commands::CommandHandler;
use super::error::HandlerResult;
use crate::connection::DispatchEvent;
use crate::events::{GatewayEventType, MessageCreateEvent, MessageReactionEvent, ReadyEvent};

/// Where an event went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Handed to the command handler on its own task
    Command,
    /// Woke the submission waiting on this message
    Approval,
    /// A reaction on a message nobody is waiting on
    UnrelatedReaction,
    Ignored,
}

/// Event router
#[derive(Debug, Clone)]
pub struct EventRouter {
    commands: CommandHandler,
    registry: Arc<ApprovalRegistry>,
}

impl EventRouter {
    pub fn new(commands: CommandHandler, registry: Arc<ApprovalRegistry>) -> Self {
        Self { commands, registry }
    }

    /// Route events until the gateway client goes away
    pub async fn run(self, mut events: mpsc::Receiver<DispatchEvent>) {
        while let Some(event) = events.recv().await {
            let name = event.event.clone();
            if let Err(e) = self.route(event) {
                debug!(event = %name, error = %e, "Dropping malformed event");
            }
        }
        info!("Event stream closed");
    }

    /// Route one event
    ///
    /// Commands run on their own task so a slow command never holds up
    /// reaction events.
    pub fn route(&self, event: DispatchEvent) -> HandlerResult<Routed> {
        let Some(kind) = GatewayEventType::from_str(&event.event) else {
            trace!(event = %event.event, "Unhandled event");
            return Ok(Routed::Ignored);
        };

        match kind {
            GatewayEventType::Ready => {
                let ready: ReadyEvent = serde_json::from_value(event.data)?;
                info!(user_id = %ready.user.id, username = %ready.user.username, "Bot ready");
                Ok(Routed::Ignored)
            }
            GatewayEventType::MessageCreate => {
                let message: MessageCreateEvent = serde_json::from_value(event.data)?;
                let commands = self.commands.clone();
                tokio::spawn(async move { commands.handle(&message).await });
                Ok(Routed::Command)
            }
            GatewayEventType::MessageReactionAdd | GatewayEventType::MessageReactionRemove => {
                let reaction: MessageReactionEvent = serde_json::from_value(event.data)?;
                if self.registry.notify(reaction.message_id) {
                    debug!(
                        message_id = %reaction.message_id,
                        emoji = %reaction.emoji,
                        "Reaction on pending approval"
                    );
                    Ok(Routed::Approval)
                } else {
                    Ok(Routed::UnrelatedReaction)
                }
            }
        }
    }
}
