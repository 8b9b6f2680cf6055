//! [`RelayOrchestrator`]: fans one inbound message out to every matching route.
//!
//! **Per route (concurrently):** delete original (optional, best effort) → punch out words
//! (optional) → transformation chain → identity lookup → one webhook post per output, in order.
//! Failures stay inside their route: they are logged and never reach other routes or messages.

use relay_core::{InboundMessage, Route};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::context::RelayContext;
use crate::mask::punch_out_random;
use crate::payload::build_payload;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// The transform service was unavailable; nothing was attempted.
    pub skipped: bool,
    pub routes_matched: usize,
    pub payloads_sent: usize,
}

#[derive(Clone)]
pub struct RelayOrchestrator {
    ctx: Arc<RelayContext>,
}

impl RelayOrchestrator {
    pub fn new(ctx: Arc<RelayContext>) -> Self {
        Self { ctx }
    }

    /// Relays `message` through all matching routes and waits for every route to finish.
    #[instrument(skip(self, message), fields(message_id = message.id, channel_id = message.channel_id))]
    pub async fn relay(&self, message: &InboundMessage) -> RelayReport {
        if !self.ctx.transformer.is_available() {
            debug!("transform service unavailable, message skipped");
            return RelayReport {
                skipped: true,
                ..RelayReport::default()
            };
        }
        if message.content.trim().is_empty() {
            return RelayReport::default();
        }

        let _busy = self.ctx.busy.enter();
        let routes = self.ctx.resolver.resolve(message).await;
        let mut report = RelayReport {
            routes_matched: routes.len(),
            ..RelayReport::default()
        };
        if routes.is_empty() {
            return report;
        }
        info!(routes = routes.len(), "step: relaying message");

        let mut tasks = JoinSet::new();
        for route in routes {
            let this = self.clone();
            let message = message.clone();
            tasks.spawn(async move { this.relay_route(&route, &message).await });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(sent) => report.payloads_sent += sent,
                Err(e) => error!(error = %e, "route task failed"),
            }
        }

        info!(sent = report.payloads_sent, "step: relay finished");
        report
    }

    /// Runs one route end to end; returns the number of payloads delivered.
    #[instrument(skip(self, route, message), fields(route = %route.key))]
    async fn relay_route(&self, route: &Route, message: &InboundMessage) -> usize {
        if route.delete_original {
            if let Err(e) = self
                .ctx
                .deleter
                .delete_message(message.channel_id, message.id)
                .await
            {
                warn!(error = %e, "failed to delete original message");
            }
        }

        let input = if route.mask_words > 0 {
            punch_out_random(&message.content, route.mask_words as usize)
        } else {
            message.content.clone()
        };

        let outputs = self
            .ctx
            .chain
            .run(&input, &route.model, route.recursion_depth)
            .await;
        if outputs.is_empty() {
            info!("no transform output, nothing to relay");
            return 0;
        }

        let identity = self
            .ctx
            .identities
            .resolve(message.author.identity(), &route.model)
            .await;

        let mut sent = 0;
        for (step, output) in outputs.iter().enumerate() {
            let payload = build_payload(output, &identity, route, message);
            match self
                .ctx
                .dispatcher
                .post(route.output_endpoint_id, &route.output_endpoint_secret, &payload)
                .await
            {
                Ok(()) => sent += 1,
                Err(e) => warn!(step, error = %e, "failed to post relay payload"),
            }
        }
        sent
    }
}
