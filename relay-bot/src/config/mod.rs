//! Bot configuration: BaseConfig (Discord + log + route file) + RpcConfig (transform service)
//! + RelaySettings (commands, cache, default model).

mod base;
mod bot_config;
mod relay;

#[cfg(test)]
mod tests;

pub use base::{routes_file_from_env, BaseConfig};
pub use bot_config::BotConfig;
pub use relay::RelaySettings;
