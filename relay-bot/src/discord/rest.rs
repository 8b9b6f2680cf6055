//! REST side of Discord used by the relay: webhook execution and message deletion.

use async_trait::async_trait;
use relay_core::{MessageDeleter, OutputDispatcher, RelayError, RelayPayload, Result};
use serde::Serialize;
use tracing::{debug, instrument};

/// Posts relay payloads to webhooks and deletes relayed source messages.
#[derive(Clone)]
pub struct DiscordRest {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

/// Webhook body: the payload plus an empty mention allowlist so relayed text never pings.
#[derive(Serialize)]
struct WebhookBody<'a> {
    #[serde(flatten)]
    payload: &'a RelayPayload,
    allowed_mentions: AllowedMentions,
}

#[derive(Serialize)]
struct AllowedMentions {
    parse: [&'static str; 0],
}

impl DiscordRest {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_base, bot_token)
    }

    pub fn with_client(
        http: reqwest::Client,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn webhook_url(&self, endpoint_id: u64, endpoint_secret: &str) -> String {
        format!("{}/webhooks/{}/{}", self.api_base, endpoint_id, endpoint_secret)
    }
}

#[async_trait]
impl OutputDispatcher for DiscordRest {
    #[instrument(skip(self, endpoint_secret, payload))]
    async fn post(
        &self,
        endpoint_id: u64,
        endpoint_secret: &str,
        payload: &RelayPayload,
    ) -> Result<()> {
        let body = WebhookBody {
            payload,
            allowed_mentions: AllowedMentions { parse: [] },
        };
        let response = self
            .http
            .post(self.webhook_url(endpoint_id, endpoint_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Dispatch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RelayError::Dispatch(format!(
                "webhook {} answered {}: {}",
                endpoint_id, status, text
            )));
        }
        debug!(endpoint_id, "payload posted");
        Ok(())
    }
}

#[async_trait]
impl MessageDeleter for DiscordRest {
    #[instrument(skip(self))]
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.api_base, channel_id, message_id
        );
        let response = self
            .http
            .delete(url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.bot_token))
            .send()
            .await
            .map_err(|e| RelayError::Delete(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Delete(format!(
                "deleting {} in {} answered {}",
                message_id, channel_id, status
            )));
        }
        Ok(())
    }
}
