//! relay-bot binary.

use anyhow::Result;
use clap::Parser;
use relay_bot::cli::{handle_ping, handle_routes, handle_transform};
use relay_bot::{run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Routes { file } => handle_routes(file).await,
        Commands::Ping => handle_ping().await,
        Commands::Transform { text, model, depth } => handle_transform(text, model, depth).await,
    }
}
