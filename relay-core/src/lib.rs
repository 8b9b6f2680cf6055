//! # relay-core
//!
//! Core types and traits for the relay bot: [`InboundMessage`], [`Route`], the [`Handler`] chain
//! contract, the [`OutputDispatcher`] / [`MessageDeleter`] seams towards the chat platform, and
//! tracing initialization. Platform-agnostic; used by route-store and relay-bot.

pub mod dispatch;
pub mod error;
pub mod logger;
pub mod types;

pub use dispatch::{
    parse_webhook_url, MessageDeleter, OutputDispatcher, RelayPayload, WebhookEndpoint,
};
pub use error::{CommandError, RelayError, Result};
pub use logger::init_tracing;
pub use types::{
    Author, Handler, HandlerResponse, InboundMessage, Route, RouteKind, MAX_RECURSION_DEPTH,
};
