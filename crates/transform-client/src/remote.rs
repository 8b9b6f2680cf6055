//! [`RemoteTransformer`]: [`TextTransformer`] over an [`RpcClient`] with runtime-adjustable sampling.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::RpcClient;
use crate::error::RpcError;
use crate::wire::SamplingConfig;
use crate::TextTransformer;

/// Shared, mutable sampling parameters. Cloning shares the same settings.
#[derive(Clone, Default)]
pub struct SamplingHandle {
    inner: Arc<RwLock<SamplingConfig>>,
}

impl SamplingHandle {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current parameters.
    pub fn current(&self) -> SamplingConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clamps and stores a new temperature; returns the value kept.
    pub fn set_temperature(&self, temperature: f32) -> f32 {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_temperature(temperature)
    }
}

pub struct RemoteTransformer {
    client: RpcClient,
    sampling: SamplingHandle,
}

impl RemoteTransformer {
    pub fn new(client: RpcClient, sampling: SamplingHandle) -> Self {
        Self { client, sampling }
    }
}

#[async_trait]
impl TextTransformer for RemoteTransformer {
    async fn transform(&self, text: &str, model: &str) -> Result<String, RpcError> {
        let sampling = self.sampling.current();
        self.client.generate(text, model, &sampling).await
    }

    fn is_available(&self) -> bool {
        self.client.is_available()
    }
}
