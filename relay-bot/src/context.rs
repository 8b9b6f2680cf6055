//! [`RelayContext`]: the shared state every handler works against, passed explicitly instead of
//! living in globals.

use relay_core::{MessageDeleter, OutputDispatcher};
use route_store::RouteStore;
use std::sync::Arc;
use transform_client::{SamplingHandle, TextTransformer};

use crate::busy::BusyTracker;
use crate::config::RelaySettings;
use crate::identity::IdentityCache;
use crate::routing::RoutingResolver;
use crate::transform_chain::TransformationChain;

pub struct RelayContext {
    pub settings: RelaySettings,
    pub transformer: Arc<dyn TextTransformer>,
    pub chain: TransformationChain,
    pub identities: IdentityCache,
    pub routes: RouteStore,
    pub resolver: RoutingResolver,
    pub dispatcher: Arc<dyn OutputDispatcher>,
    pub deleter: Arc<dyn MessageDeleter>,
    pub sampling: SamplingHandle,
    pub busy: BusyTracker,
}

impl RelayContext {
    /// Wires the derived parts (chain, identity cache, resolver) around the given seams.
    pub fn new(
        settings: RelaySettings,
        transformer: Arc<dyn TextTransformer>,
        routes: RouteStore,
        dispatcher: Arc<dyn OutputDispatcher>,
        deleter: Arc<dyn MessageDeleter>,
        sampling: SamplingHandle,
    ) -> Self {
        Self {
            settings,
            chain: TransformationChain::new(transformer.clone()),
            identities: IdentityCache::new(transformer.clone()),
            resolver: RoutingResolver::new(routes.clone()),
            transformer,
            routes,
            dispatcher,
            deleter,
            sampling,
            busy: BusyTracker::new(),
        }
    }
}
