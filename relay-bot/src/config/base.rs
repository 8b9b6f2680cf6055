//! Base config: Discord connection, logging, route file. Loaded from env.

use anyhow::{Context, Result};
use std::env;

/// Discord REST base used for webhook posts and message deletion.
pub const DEFAULT_WEBHOOK_API_URL: &str = "https://discord.com/api/v10";

/// Base config: Discord-related, logging, persistence only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// DISCORD_TOKEN (falls back to BOT_TOKEN)
    pub discord_token: String,
    /// WEBHOOK_API_URL
    pub webhook_api_url: String,
    /// Log file path
    pub log_file: String,
    /// JSON file holding the route table
    pub routes_file: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides DISCORD_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let discord_token = match token {
            Some(t) => t,
            None => env::var("DISCORD_TOKEN")
                .or_else(|_| env::var("BOT_TOKEN"))
                .context("DISCORD_TOKEN not set")?,
        };
        let webhook_api_url = env::var("WEBHOOK_API_URL")
            .unwrap_or_else(|_| DEFAULT_WEBHOOK_API_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/relay-bot.log".to_string());
        let routes_file = routes_file_from_env();

        Ok(Self {
            discord_token,
            webhook_api_url,
            log_file,
            routes_file,
        })
    }

    /// Validate config (token present, API url parseable).
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.trim().is_empty() {
            anyhow::bail!("DISCORD_TOKEN is empty");
        }
        if reqwest::Url::parse(&self.webhook_api_url).is_err() {
            anyhow::bail!(
                "WEBHOOK_API_URL is set but not a valid URL: {}",
                self.webhook_api_url
            );
        }
        Ok(())
    }
}

/// ROUTES_FILE, default `data/routes.json`. Needs no token, so the CLI can read routes offline.
pub fn routes_file_from_env() -> String {
    env::var("ROUTES_FILE").unwrap_or_else(|_| "data/routes.json".to_string())
}
