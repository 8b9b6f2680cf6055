//! Route store backed by a single JSON file: an object mapping route key to [`Route`].
//!
//! Loaded once at startup; a missing or unreadable file yields an empty store. Every mutation
//! rewrites the whole file (temp file + rename) before the in-memory map is updated.

use relay_core::Route;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::error::StoreError;

/// Result of [`RouteStore::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Created(Route),
    Enabled(Route),
    Disabled(Route),
}

impl ToggleOutcome {
    pub fn route(&self) -> &Route {
        match self {
            ToggleOutcome::Created(r) | ToggleOutcome::Enabled(r) | ToggleOutcome::Disabled(r) => r,
        }
    }
}

#[derive(Clone)]
pub struct RouteStore {
    path: PathBuf,
    routes: Arc<RwLock<BTreeMap<String, Route>>>,
}

impl RouteStore {
    /// Opens the store at `path`. Never fails: absence or corruption degrades to an empty set.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let routes = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Route>>(&bytes) {
                Ok(mut routes) => {
                    // Hand-edited files may carry depths above the cap.
                    for route in routes.values_mut() {
                        route.set_recursion_depth(route.recursion_depth);
                    }
                    info!(path = %path.display(), count = routes.len(), "Loaded routes");
                    routes
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Route file is corrupt, starting with no routes");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No route file yet, starting with no routes");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Route file unreadable, starting with no routes");
                BTreeMap::new()
            }
        };
        Self {
            path,
            routes: Arc::new(RwLock::new(routes)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All routes in key order.
    pub async fn snapshot(&self) -> Vec<Route> {
        self.routes.read().await.values().cloned().collect()
    }

    pub async fn get(&self, key: &str) -> Option<Route> {
        self.routes.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }

    /// Inserts `route` if its key is new; otherwise flips `disabled` on the stored route, takes
    /// the webhook secret from `route` (it is not part of the key) and keeps its other settings.
    #[instrument(skip(self, route), fields(key = %route.key))]
    pub async fn toggle(&self, route: Route) -> Result<ToggleOutcome, StoreError> {
        let mut routes = self.routes.write().await;
        let mut next = routes.clone();
        let outcome = match next.get_mut(&route.key) {
            Some(existing) => {
                existing.disabled = !existing.disabled;
                existing
                    .output_endpoint_secret
                    .clone_from(&route.output_endpoint_secret);
                if existing.disabled {
                    ToggleOutcome::Disabled(existing.clone())
                } else {
                    ToggleOutcome::Enabled(existing.clone())
                }
            }
            None => {
                next.insert(route.key.clone(), route.clone());
                ToggleOutcome::Created(route)
            }
        };
        self.persist(&next).await?;
        *routes = next;
        info!(outcome = outcome_name(&outcome), "Route toggled");
        Ok(outcome)
    }

    /// Applies `f` to the route stored under `key` and persists the result.
    pub async fn update<F>(&self, key: &str, f: F) -> Result<Route, StoreError>
    where
        F: FnOnce(&mut Route),
    {
        let mut routes = self.routes.write().await;
        let mut next = routes.clone();
        let route = next
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        f(route);
        let updated = route.clone();
        self.persist(&next).await?;
        *routes = next;
        info!(key = %key, "Route updated");
        Ok(updated)
    }

    pub async fn remove(&self, key: &str) -> Result<Route, StoreError> {
        let mut routes = self.routes.write().await;
        let mut next = routes.clone();
        let removed = next
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        self.persist(&next).await?;
        *routes = next;
        info!(key = %key, "Route removed");
        Ok(removed)
    }

    async fn persist(&self, routes: &BTreeMap<String, Route>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let json = serde_json::to_vec_pretty(routes)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

fn outcome_name(outcome: &ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Created(_) => "created",
        ToggleOutcome::Enabled(_) => "enabled",
        ToggleOutcome::Disabled(_) => "disabled",
    }
}
