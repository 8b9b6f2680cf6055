//! BotConfig: BaseConfig + RpcConfig + RelaySettings. Use load() for env-based loading.

use anyhow::Result;
use transform_client::RpcConfig;

use super::{BaseConfig, RelaySettings};

/// Bot config. Use BotConfig::load() for env-based loading, then validate() before init.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub rpc: RpcConfig,
    pub relay: RelaySettings,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides DISCORD_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let rpc = RpcConfig::from_env()?;
        let relay = RelaySettings::from_env()?;
        Ok(Self { base, rpc, relay })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.rpc.validate()?;
        self.relay.validate()
    }

    pub fn discord_token(&self) -> &str {
        &self.base.discord_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn routes_file(&self) -> &str {
        &self.base.routes_file
    }
    pub fn webhook_api_url(&self) -> &str {
        &self.base.webhook_api_url
    }
}
