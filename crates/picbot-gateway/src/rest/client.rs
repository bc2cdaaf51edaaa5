//! REST client for the chat platform's `/api/v1` routes

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use picbot_common::BotConfig;
use picbot_core::entities::ReactionCount;
use picbot_core::traits::{ChatGateway, PortResult};
use picbot_core::Snowflake;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::error::RestError;
use super::models::{ChannelBody, CreateDmBody, CreateMessageBody, MessageBody};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat platform REST client
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base: Url,
    authorization: String,
}

impl RestClient {
    /// Create a client for `api_url` authenticating with `token`
    pub fn new(api_url: &str, token: &str) -> Result<Self, RestError> {
        let base = Url::parse(api_url).map_err(|e| RestError::Endpoint(format!("{api_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RestError::Endpoint(api_url.to_string()));
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base,
            authorization: format!("Bearer {token}"),
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, RestError> {
        Self::new(&config.api_url, &config.token)
    }

    /// `base/seg1/seg2/...`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RestError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RestError::Endpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(header::AUTHORIZATION, &self.authorization)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, RestError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RestError::Status { status, body })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RestError> {
        Ok(self.send(request).await?.json().await?)
    }

    async fn post_message(&self, channel_id: Snowflake, content: &str) -> Result<MessageBody, RestError> {
        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;
        self.send_json(self.http.post(url).json(&CreateMessageBody { content }))
            .await
    }

    async fn post_file(
        &self,
        channel_id: Snowflake,
        content: &str,
        path: &Path,
        file_name: &str,
    ) -> Result<MessageBody, RestError> {
        let bytes = tokio::fs::read(path).await?;
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let payload = serde_json::json!({ "content": content }).to_string();

        let form = Form::new().text("payload_json", payload).part(
            "files[0]",
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime.as_ref())?,
        );

        let url = self.endpoint(&["channels", &channel_id.to_string(), "messages"])?;
        self.send_json(self.http.post(url).multipart(form)).await
    }

    async fn put_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> Result<(), RestError> {
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
            "reactions",
            emoji,
            "@me",
        ])?;
        self.send(self.http.put(url)).await?;
        Ok(())
    }

    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<MessageBody, RestError> {
        let url = self.endpoint(&[
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
        ])?;
        self.send_json(self.http.get(url)).await
    }

    async fn create_dm(&self, user_id: Snowflake) -> Result<ChannelBody, RestError> {
        let url = self.endpoint(&["users", "@me", "channels"])?;
        self.send_json(self.http.post(url).json(&CreateDmBody {
            recipient_id: user_id,
        }))
        .await
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatGateway for RestClient {
    #[instrument(skip(self, content))]
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake> {
        let message = self.post_message(channel_id, content).await?;
        debug!(message_id = %message.id, "message sent");
        Ok(message.id)
    }

    #[instrument(skip(self, content, path))]
    async fn send_file(
        &self,
        channel_id: Snowflake,
        content: &str,
        path: &Path,
        file_name: &str,
    ) -> PortResult<Snowflake> {
        let message = self.post_file(channel_id, content, path, file_name).await?;
        debug!(message_id = %message.id, "file sent");
        Ok(message.id)
    }

    #[instrument(skip(self))]
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PortResult<()> {
        Ok(self.put_reaction(channel_id, message_id, emoji).await?)
    }

    #[instrument(skip(self))]
    async fn get_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Vec<ReactionCount>> {
        let message = self.fetch_message(channel_id, message_id).await?;
        Ok(message.reactions.into_iter().map(ReactionCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn open_dm(&self, user_id: Snowflake) -> PortResult<Snowflake> {
        Ok(self.create_dm(user_id).await?.id)
    }
}
