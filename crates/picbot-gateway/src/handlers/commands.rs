//! Command handler - runs chat commands against the services

use std::sync::Arc;

use picbot_core::entities::{Invocation, SubmissionSource};
use picbot_core::Snowflake;
use picbot_service::{
    CollectionListing, CreateAliasRequest, PictureAdder, PictureService, RemovePictureRequest,
    ServiceContext, SubmissionRequest,
};
use tracing::{debug, error, info, instrument, warn};

use super::command::Command;
use super::error::{HandlerError, HandlerResult};
use crate::events::MessageCreateEvent;

/// Handles prefixed chat messages
#[derive(Clone)]
pub struct CommandHandler {
    ctx: Arc<ServiceContext>,
    adder: PictureAdder,
    prefix: String,
}

impl CommandHandler {
    pub fn new(ctx: Arc<ServiceContext>, prefix: impl Into<String>) -> Self {
        Self {
            adder: PictureAdder::new(Arc::clone(&ctx)),
            ctx,
            prefix: prefix.into(),
        }
    }

    /// Run the command in a message, if it holds one
    ///
    /// User errors are answered in the channel; anything else is logged and
    /// answered with a short failure note.
    #[instrument(skip(self, message), fields(message_id = %message.id, user_id = %message.author.id))]
    pub async fn handle(&self, message: &MessageCreateEvent) {
        if message.author.bot {
            return;
        }
        let Some(command) = Command::parse(&message.content, &self.prefix) else {
            return;
        };
        debug!(?command, "Command received");

        let invocation = message.invocation();
        let silent_on_miss = matches!(command, Command::Pic { explicit: false, .. });

        match self.execute(command, message, &invocation).await {
            Ok(Some(reply)) => self.reply(invocation.channel_id, &reply).await,
            Ok(None) => {}
            Err(e) if e.is_user_facing() => {
                if !silent_on_miss {
                    self.reply(invocation.channel_id, &format!("{} {e}", invocation.user_id.mention()))
                        .await;
                }
            }
            Err(e) => {
                error!(error = %e, "Command failed");
                self.reply(invocation.channel_id, "Something went wrong, try again later.")
                    .await;
            }
        }
    }

    async fn execute(
        &self,
        command: Command,
        message: &MessageCreateEvent,
        invocation: &Invocation,
    ) -> HandlerResult<Option<String>> {
        let pictures = PictureService::new(&self.ctx);

        let reply = match command {
            Command::AddPic { name, url } => {
                let source = match url {
                    Some(url) => SubmissionSource::Url(url),
                    None => SubmissionSource::Attachments(message.domain_attachments()),
                };
                let request = SubmissionRequest::new(name, *invocation, source);
                // The submission reports its own outcome
                drop(self.adder.spawn(request));
                return Ok(None);
            }
            Command::Pic { name, .. } => pictures.random_picture(&name, invocation).await?.url,
            Command::Pics => render_listing(&pictures.list_collections(invocation).await?),
            Command::RmPic { name, key } => {
                pictures
                    .remove_picture(
                        RemovePictureRequest {
                            collection: name.clone(),
                            storage_key: key.clone(),
                        },
                        invocation,
                    )
                    .await?;
                info!(collection = %name, storage_key = %key, "Picture removed by command");
                format!("Removed `{key}` from `{name}`.")
            }
            Command::Alias { alias, target } => {
                pictures
                    .add_alias(
                        CreateAliasRequest {
                            alias: alias.clone(),
                            target: target.clone(),
                        },
                        invocation,
                    )
                    .await?;
                format!("`{alias}` now points to `{target}`.")
            }
            Command::Unalias { alias } => {
                pictures.remove_alias(&alias, invocation).await?;
                format!("Removed alias `{alias}`.")
            }
            Command::Usage(usage) => format!("Usage: `{}{usage}`", self.prefix),
        };
        Ok(Some(reply))
    }

    async fn reply(&self, channel_id: Snowflake, content: &str) {
        if let Err(e) = self.ctx.gateway().send_message(channel_id, content).await {
            warn!(channel_id = %channel_id, error = %HandlerError::from(e), "could not reply");
        }
    }
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

fn render_listing(listings: &[CollectionListing]) -> String {
    if listings.is_empty() {
        return "No collections yet.".to_string();
    }
    listings
        .iter()
        .map(|l| format!("`{}` ({})", l.name, l.image_count))
        .collect::<Vec<_>>()
        .join("\n")
}
