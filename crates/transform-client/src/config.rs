//! RPC client configuration loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::wire::SamplingConfig;

/// Connection and timing settings for [`crate::RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// ZeroMQ endpoint of the transform service.
    pub endpoint: String,
    /// Deadline for `generate` requests.
    pub request_timeout: Duration,
    /// Period of the heartbeat probe.
    pub heartbeat_interval: Duration,
    /// Deadline for a heartbeat `ping`; kept much shorter than `request_timeout`.
    pub heartbeat_timeout: Duration,
    /// Value of the `from` field on every request.
    pub origin: String,
    /// Initial sampling parameters; temperature can be changed at runtime.
    pub sampling: SamplingConfig,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "tcp://127.0.0.1:5556".to_string(),
            request_timeout: Duration::from_millis(30_000),
            heartbeat_interval: Duration::from_secs(60),
            heartbeat_timeout: Duration::from_millis(100),
            origin: "relay-bot".to_string(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl RpcConfig {
    /// Load from environment variables; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let endpoint = env::var("TRANSFORM_ENDPOINT").unwrap_or(defaults.endpoint);
        let request_timeout = env_duration_ms("TRANSFORM_TIMEOUT_MS")?
            .unwrap_or(defaults.request_timeout);
        let heartbeat_interval = env_u64("HEARTBEAT_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.heartbeat_interval);
        let heartbeat_timeout = env_duration_ms("HEARTBEAT_TIMEOUT_MS")?
            .unwrap_or(defaults.heartbeat_timeout);
        let origin = env::var("TRANSFORM_ORIGIN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.origin);
        let mut sampling = defaults.sampling;
        if let Ok(raw) = env::var("TEMPERATURE") {
            let t: f32 = raw
                .parse()
                .with_context(|| format!("TEMPERATURE is not a number: {}", raw))?;
            sampling.set_temperature(t);
        }

        Ok(Self {
            endpoint,
            request_timeout,
            heartbeat_interval,
            heartbeat_timeout,
            origin,
            sampling,
        })
    }

    /// Fail fast on settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.contains("://") {
            anyhow::bail!("TRANSFORM_ENDPOINT must look like tcp://host:port, got {}", self.endpoint);
        }
        if self.request_timeout.is_zero() || self.heartbeat_timeout.is_zero() {
            anyhow::bail!("RPC timeouts must be greater than zero");
        }
        if self.heartbeat_interval.is_zero() {
            anyhow::bail!("HEARTBEAT_INTERVAL_SECS must be greater than zero");
        }
        Ok(())
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} is not an integer: {}", name, raw)),
        Err(_) => Ok(None),
    }
}

fn env_duration_ms(name: &str) -> Result<Option<Duration>> {
    Ok(env_u64(name)?.map(Duration::from_millis))
}
