//! Identity cache: memoizes the transformed form of author display names.
//!
//! Keys are the original identity strings, values the transformed ones. Entries never expire on
//! their own; a periodic task drops one random entry at a time while the relay is idle, so names
//! get re-transformed over the life of the process.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};
use transform_client::TextTransformer;

use crate::busy::BusyTracker;

#[derive(Clone)]
pub struct IdentityCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    transformer: Arc<dyn TextTransformer>,
}

impl IdentityCache {
    pub fn new(transformer: Arc<dyn TextTransformer>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            transformer,
        }
    }

    /// Returns the transformed identity, calling the transformer only on a miss. When the call
    /// fails the original identity is returned and nothing is cached.
    pub async fn resolve(&self, identity: &str, model: &str) -> String {
        if let Some(hit) = self.entries.lock().await.get(identity) {
            debug!(identity = %identity, "identity cache hit");
            return hit.clone();
        }

        match self.transformer.transform(identity, model).await {
            Ok(transformed) => {
                self.entries
                    .lock()
                    .await
                    .insert(identity.to_string(), transformed.clone());
                transformed
            }
            Err(e) => {
                debug!(identity = %identity, error = %e, "identity transform failed, using original");
                identity.to_string()
            }
        }
    }

    pub async fn get(&self, identity: &str) -> Option<String> {
        self.entries.lock().await.get(identity).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Removes one uniformly chosen entry unless the relay is busy or the cache is empty.
    /// Returns the evicted key.
    pub async fn evict_random<R: Rng + ?Sized>(
        &self,
        busy: &BusyTracker,
        rng: &mut R,
    ) -> Option<String> {
        if busy.is_busy() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        let key = entries.keys().choose(rng).cloned()?;
        entries.remove(&key);
        Some(key)
    }

    /// Runs [`Self::evict_random`] every `period`, starting one period from now.
    pub fn spawn_eviction(&self, period: Duration, busy: BusyTracker) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Some(key) = cache.evict_random(&busy, &mut rng).await {
                    info!(identity = %key, "evicted identity from cache");
                }
            }
        })
    }
}
