//! Discord glue: gateway event handler (serenity), event → [`relay_core::InboundMessage`]
//! conversion, and the REST client used for webhook posts and message deletion.

mod adapters;
mod event_handler;
mod rest;

pub use adapters::{message_link, to_inbound, truncate_reply, MAX_REPLY_CHARS};
pub use event_handler::RelayEventHandler;
pub use rest::DiscordRest;
