use async_trait::async_trait;
use relay_core::{Handler, HandlerResponse, InboundMessage, Result};
use tracing::{debug, instrument};

use crate::relay::RelayOrchestrator;

/// Last handler in the chain: relays the message through every matching route.
#[derive(Clone)]
pub struct RelayHandler {
    orchestrator: RelayOrchestrator,
}

impl RelayHandler {
    pub fn new(orchestrator: RelayOrchestrator) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl Handler for RelayHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &InboundMessage) -> Result<HandlerResponse> {
        let report = self.orchestrator.relay(message).await;
        debug!(
            message_id = message.id,
            skipped = report.skipped,
            routes = report.routes_matched,
            sent = report.payloads_sent,
            "Relay handled"
        );
        if report.routes_matched > 0 {
            Ok(HandlerResponse::Stop)
        } else {
            Ok(HandlerResponse::Continue)
        }
    }
}
