use anyhow::{Context, Result};
use relay_core::init_tracing;
use tracing::{info, instrument};

use crate::components::build_bot_components;
use crate::config::BotConfig;
use crate::discord::RelayEventHandler;

/// Main entry: validate config, init logging, build components, start background tasks, then
/// run the Discord gateway client until it stops.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(Some(config.log_file()))?;

    info!(
        transform_endpoint = %config.rpc.endpoint,
        routes_file = %config.routes_file(),
        default_model = %config.relay.default_model,
        "Initializing bot"
    );

    let components = build_bot_components(&config).await;
    let background = components.spawn_background_tasks(&config);

    let handler = RelayEventHandler::new(components.handler_chain.clone());
    let mut client =
        serenity::Client::builder(config.discord_token(), RelayEventHandler::intents())
            .event_handler(handler)
            .await
            .context("Failed to create Discord client")?;

    info!("Bot started");
    let result = client.start().await;

    for task in background {
        task.abort();
    }
    result.context("Discord client stopped")
}
