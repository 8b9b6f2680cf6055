//! Seams towards the chat platform: posting relay payloads and deleting source messages.
//!
//! [`OutputDispatcher`] and [`MessageDeleter`] are transport-agnostic; relay-bot implements them
//! over the Discord HTTP API, tests substitute recording mocks.

use crate::error::{CommandError, Result};
use async_trait::async_trait;
use serde::Serialize;

/// Credentials of one destination webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub id: u64,
    pub token: String,
}

/// Extracts id and token from a webhook URL such as
/// `https://discord.com/api/webhooks/<id>/<token>` (API version segments and query are ignored).
pub fn parse_webhook_url(url: &str) -> std::result::Result<WebhookEndpoint, CommandError> {
    let invalid = || CommandError::InvalidArgument(format!("not a webhook url: {}", url));
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').skip_while(|s| *s != "webhooks").skip(1);
    let id = segments
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(invalid)?;
    let token = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;
    Ok(WebhookEndpoint {
        id,
        token: token.to_string(),
    })
}

/// Body posted to a destination webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub content: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Delivers relay payloads to a destination endpoint. Fire-and-forget from the caller's view:
/// errors are reported so they can be logged, never retried.
#[async_trait]
pub trait OutputDispatcher: Send + Sync {
    async fn post(
        &self,
        endpoint_id: u64,
        endpoint_secret: &str,
        payload: &RelayPayload,
    ) -> Result<()>;
}

/// Removes a source message once it has been relayed.
#[async_trait]
pub trait MessageDeleter: Send + Sync {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;
}
