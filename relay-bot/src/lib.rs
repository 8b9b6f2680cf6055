//! # Relay bot
//!
//! Discord bot that relays messages from configured sources (channel, server or author) to
//! destination webhooks after passing them through a remote text-transform service.
//!
//! **Flow:** gateway message → [`HandlerChain`] ([`CommandHandler`] → [`RelayHandler`]) →
//! [`RelayOrchestrator`] → per route: [`TransformationChain`] + [`IdentityCache`] →
//! [`relay_core::OutputDispatcher`].

pub mod busy;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod context;
pub mod discord;
pub mod handlers;
pub mod identity;
pub mod mask;
pub mod payload;
pub mod relay;
pub mod routing;
pub mod runner;
pub mod transform_chain;

pub use busy::{BusyGuard, BusyTracker};
pub use chain::HandlerChain;
pub use cli::{Cli, Commands};
pub use commands::{parse_command, Command};
pub use components::{build_bot_components, build_components_with, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig, RelaySettings};
pub use context::RelayContext;
pub use handlers::{CommandHandler, RelayHandler};
pub use identity::IdentityCache;
pub use mask::punch_out_words;
pub use payload::build_payload;
pub use relay::{RelayOrchestrator, RelayReport};
pub use routing::{match_routes, RoutingResolver};
pub use runner::run_bot;
pub use transform_chain::TransformationChain;
