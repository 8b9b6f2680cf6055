//! Relay settings: command surface, identity cache eviction, default model.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "T5-mihm-gc";

#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Model used for routes created from chat and for standalone transforms.
    pub default_model: String,
    /// Prefix that marks a chat message as a command.
    pub command_prefix: String,
    /// Users allowed to manage routes; empty means everyone.
    pub admin_user_ids: Vec<u64>,
    /// Period of the identity cache eviction task.
    pub cache_evict_interval: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            command_prefix: "!".to_string(),
            admin_user_ids: Vec::new(),
            cache_evict_interval: Duration::from_secs(300),
        }
    }
}

impl RelaySettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let default_model = env::var("DEFAULT_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_model);
        let command_prefix = env::var("COMMAND_PREFIX")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.command_prefix);
        let admin_user_ids = match env::var("ADMIN_USER_IDS") {
            Ok(raw) => parse_id_list(&raw)?,
            Err(_) => defaults.admin_user_ids,
        };
        let cache_evict_interval = match env::var("CACHE_EVICT_INTERVAL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("CACHE_EVICT_INTERVAL_SECS is not a number: {}", raw))?,
            ),
            Err(_) => defaults.cache_evict_interval,
        };

        Ok(Self {
            default_model,
            command_prefix,
            admin_user_ids,
            cache_evict_interval,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_evict_interval.is_zero() {
            anyhow::bail!("CACHE_EVICT_INTERVAL_SECS must be greater than zero");
        }
        Ok(())
    }

    /// Whether `user_id` may run route-management commands.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_user_ids.is_empty() || self.admin_user_ids.contains(&user_id)
    }
}

/// Comma- or whitespace-separated list of numeric ids.
fn parse_id_list(raw: &str) -> Result<Vec<u64>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("ADMIN_USER_IDS contains a non-numeric id: {}", s))
        })
        .collect()
}
