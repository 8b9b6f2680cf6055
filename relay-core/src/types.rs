//! Core types: inbound message, author, route, handler response, and the Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dispatch::WebhookEndpoint;

/// Upper bound for [`Route::recursion_depth`] (additional chained calls after the first).
pub const MAX_RECURSION_DEPTH: u32 = 5;

/// Author of an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    /// Account name.
    pub name: String,
    /// Server nickname or global display name, when the platform provides one.
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Author {
    /// Name shown in the source channel: display name when set and non-blank, else account name.
    pub fn identity(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// A chat message as seen by the relay, converted from the platform event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: u64,
    pub channel_id: u64,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub author: Author,
    pub content: String,
    /// Set when the message was posted through a webhook; used for loop prevention.
    pub webhook_id: Option<u64>,
    /// Permalink to the message.
    pub link: String,
    pub created_at: DateTime<Utc>,
}

/// Which source identifier a route is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Author,
    Server,
    Channel,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RouteKind::Author => "author",
            RouteKind::Server => "server",
            RouteKind::Channel => "channel",
        };
        f.write_str(s)
    }
}

/// One relay rule: messages from a source (author, server or channel) are transformed and
/// republished through the destination webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub key: String,
    pub source_author: Option<u64>,
    pub source_server: Option<u64>,
    pub source_channel: Option<u64>,
    pub destination_channel: u64,
    pub delete_original: bool,
    pub output_endpoint_id: u64,
    pub output_endpoint_secret: String,
    pub model: String,
    pub disabled: bool,
    pub recursion_depth: u32,
    /// Words punched out of the inbound text before the first transform call.
    #[serde(default)]
    pub mask_words: u32,
}

impl Route {
    /// Builds an enabled route bound to `source` with depth 0 and original kept.
    pub fn new(
        kind: RouteKind,
        source: u64,
        destination_channel: u64,
        endpoint: WebhookEndpoint,
        model: impl Into<String>,
    ) -> Self {
        let (source_author, source_server, source_channel) = match kind {
            RouteKind::Author => (Some(source), None, None),
            RouteKind::Server => (None, Some(source), None),
            RouteKind::Channel => (None, None, Some(source)),
        };
        Self {
            key: Self::derive_key(kind, source, endpoint.id),
            source_author,
            source_server,
            source_channel,
            destination_channel,
            delete_original: false,
            output_endpoint_id: endpoint.id,
            output_endpoint_secret: endpoint.token,
            model: model.into(),
            disabled: false,
            recursion_depth: 0,
            mask_words: 0,
        }
    }

    /// Deterministic key: the same source and endpoint always produce the same key.
    pub fn derive_key(kind: RouteKind, source: u64, endpoint_id: u64) -> String {
        format!("{}:{}->{}", kind, source, endpoint_id)
    }

    pub fn kind(&self) -> Option<RouteKind> {
        if self.source_channel.is_some() {
            Some(RouteKind::Channel)
        } else if self.source_server.is_some() {
            Some(RouteKind::Server)
        } else if self.source_author.is_some() {
            Some(RouteKind::Author)
        } else {
            None
        }
    }

    /// Sets the recursion depth, clamped to [`MAX_RECURSION_DEPTH`].
    pub fn set_recursion_depth(&mut self, depth: u32) {
        self.recursion_depth = depth.min(MAX_RECURSION_DEPTH);
    }
}

/// Handler result for the chain. `Reply(text)` is sent back to the source channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; nothing to send back.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and answer in the source channel.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. Chain runs all before, then handle
/// until Stop/Reply, then all after in reverse.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &InboundMessage) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase.
    async fn handle(&self, _message: &InboundMessage) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &InboundMessage,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
