//! Gateway event handler: every message goes through the handler chain; replies are sent back
//! to the source channel.

use relay_core::HandlerResponse;
use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

use super::adapters::{to_inbound, truncate_reply};
use crate::chain::HandlerChain;

pub struct RelayEventHandler {
    chain: HandlerChain,
    /// Bot's own user id, known after `ready`; 0 before.
    own_user_id: AtomicU64,
}

impl RelayEventHandler {
    pub fn new(chain: HandlerChain) -> Self {
        Self {
            chain,
            own_user_id: AtomicU64::new(0),
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for RelayEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.own_user_id
            .store(ready.user.id.get(), Ordering::SeqCst);
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Discord gateway ready"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.id.get() == self.own_user_id.load(Ordering::SeqCst) {
            return;
        }

        let inbound = to_inbound(&msg);
        debug!(
            author_id = inbound.author.id,
            channel_id = inbound.channel_id,
            webhook_id = ?inbound.webhook_id,
            "Received message"
        );

        match self.chain.handle(&inbound).await {
            Ok(HandlerResponse::Reply(text)) => {
                if let Err(e) = msg.channel_id.say(&ctx.http, truncate_reply(&text)).await {
                    warn!(error = %e, channel_id = inbound.channel_id, "Failed to send reply");
                }
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, message_id = inbound.id, "Handler chain failed"),
        }
    }
}
