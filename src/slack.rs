use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::SlackConfig;

/// A message retrieved from the channel. Immutable once fetched; the `id` is
/// the provider-assigned timestamp token.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub id: String,
    pub body: String,
    pub channel: String,
}

/// The chat transport as seen by the poll loop.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Most recent message in the channel, or `None` when the channel cannot
    /// be resolved or has no history.
    async fn fetch_latest_message(&self, channel: &str) -> Result<Option<ChannelMessage>>;

    /// Fire-and-forget notification; failures are logged, never surfaced.
    async fn post_message(&self, channel: &str, text: &str);
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<ChannelInfo>,
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ConversationsHistoryResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<HistoryMessage>,
}

#[derive(Debug, Deserialize)]
struct HistoryMessage {
    ts: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackClient {
    client: reqwest::Client,
    config: SlackConfig,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Look the channel up among the conversations visible to the bot token.
    async fn resolve_channel(&self, channel: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get("https://slack.com/api/conversations.list")
            .bearer_auth(&self.config.token)
            .send()
            .await
            .context("Failed to call conversations.list")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Slack API error ({}): {}", status, error_body);
        }

        let list: ConversationsListResponse = response
            .json()
            .await
            .context("Failed to parse conversations.list response")?;

        if !list.ok {
            anyhow::bail!(
                "conversations.list rejected: {}",
                list.error.unwrap_or_else(|| "unknown".to_string())
            );
        }

        Ok(list
            .channels
            .into_iter()
            .map(|c| c.id)
            .find(|id| id.as_str() == channel))
    }
}

#[async_trait]
impl MessageSource for SlackClient {
    async fn fetch_latest_message(&self, channel: &str) -> Result<Option<ChannelMessage>> {
        let channel_id = match self.resolve_channel(channel).await? {
            Some(id) => id,
            None => {
                warn!("Channel '{}' not visible to the bot token", channel);
                return Ok(None);
            }
        };

        let response = self
            .client
            .get("https://slack.com/api/conversations.history")
            .bearer_auth(&self.config.token)
            .query(&[("channel", channel_id.as_str()), ("limit", "1")])
            .send()
            .await
            .context("Failed to call conversations.history")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Slack API error ({}): {}", status, error_body);
        }

        let history: ConversationsHistoryResponse = response
            .json()
            .await
            .context("Failed to parse conversations.history response")?;

        if !history.ok {
            anyhow::bail!(
                "conversations.history rejected: {}",
                history.error.unwrap_or_else(|| "unknown".to_string())
            );
        }

        let Some(message) = history.messages.into_iter().next() else {
            debug!("Channel '{}' has no messages", channel_id);
            return Ok(None);
        };

        Ok(Some(ChannelMessage {
            id: message.ts,
            body: message.text,
            channel: channel_id,
        }))
    }

    async fn post_message(&self, channel: &str, text: &str) {
        let request = PostMessageRequest { channel, text };

        let result = self
            .client
            .post("https://slack.com/api/chat.postMessage")
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await;

        match result {
            Ok(response) => match response.json::<PostMessageResponse>().await {
                Ok(posted) if posted.ok => debug!("Posted reply to '{}'", channel),
                Ok(posted) => error!(
                    "chat.postMessage rejected: {}",
                    posted.error.unwrap_or_else(|| "unknown".to_string())
                ),
                Err(e) => error!("Failed to parse chat.postMessage response: {}", e),
            },
            Err(e) => error!("Failed to post message to '{}': {}", channel, e),
        }
    }
}
