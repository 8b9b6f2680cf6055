//! Route matching for inbound messages, with loop prevention.

use relay_core::{InboundMessage, Route};
use route_store::RouteStore;

/// Matches inbound messages against the current route table.
#[derive(Clone)]
pub struct RoutingResolver {
    store: RouteStore,
}

impl RoutingResolver {
    pub fn new(store: RouteStore) -> Self {
        Self { store }
    }

    /// Routes the message should be relayed through, in key order.
    pub async fn resolve(&self, message: &InboundMessage) -> Vec<Route> {
        let routes = self.store.snapshot().await;
        match_routes(message, &routes)
    }
}

/// True when the message was posted through the output endpoint of an enabled route.
pub fn is_self_originated(message: &InboundMessage, routes: &[Route]) -> bool {
    match message.webhook_id {
        Some(origin) => routes
            .iter()
            .any(|r| !r.disabled && r.output_endpoint_id == origin),
        None => false,
    }
}

/// Enabled routes bound to the message's channel, server or author. Empty when the message is
/// one of the relay's own outputs. Input order is preserved.
pub fn match_routes(message: &InboundMessage, routes: &[Route]) -> Vec<Route> {
    if is_self_originated(message, routes) {
        return Vec::new();
    }
    routes
        .iter()
        .filter(|r| !r.disabled && matches_source(r, message))
        .cloned()
        .collect()
}

fn matches_source(route: &Route, message: &InboundMessage) -> bool {
    route.source_channel == Some(message.channel_id)
        || (message.guild_id.is_some() && route.source_server == message.guild_id)
        || route.source_author == Some(message.author.id)
}
