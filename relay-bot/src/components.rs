//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use relay_core::{MessageDeleter, OutputDispatcher};
use route_store::RouteStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};
use transform_client::{
    Connector, RemoteTransformer, RpcClient, SamplingHandle, TextTransformer, ZmqConnector,
};

use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::context::RelayContext;
use crate::discord::DiscordRest;
use crate::handlers::{CommandHandler, RelayHandler};
use crate::relay::RelayOrchestrator;

/// Everything run_bot needs; produced by the component factory.
pub struct BotComponents {
    pub context: Arc<RelayContext>,
    pub rpc: RpcClient,
    pub handler_chain: HandlerChain,
}

impl BotComponents {
    /// Starts the heartbeat probe and identity cache eviction.
    pub fn spawn_background_tasks(&self, config: &BotConfig) -> Vec<JoinHandle<()>> {
        vec![
            self.rpc.spawn_heartbeat(config.rpc.heartbeat_interval),
            self.context.identities.spawn_eviction(
                config.relay.cache_evict_interval,
                self.context.busy.clone(),
            ),
        ]
    }
}

/// Production wiring: ZeroMQ transport and Discord REST.
pub async fn build_bot_components(config: &BotConfig) -> BotComponents {
    let connector = Arc::new(ZmqConnector::new(config.rpc.endpoint.clone()));
    let rest = Arc::new(DiscordRest::new(
        config.webhook_api_url(),
        config.discord_token(),
    ));
    build_components_with(config, connector, rest.clone(), rest).await
}

/// Wiring with injected transport and platform seams (tests pass mocks here).
#[instrument(skip_all)]
pub async fn build_components_with(
    config: &BotConfig,
    connector: Arc<dyn Connector>,
    dispatcher: Arc<dyn OutputDispatcher>,
    deleter: Arc<dyn MessageDeleter>,
) -> BotComponents {
    let rpc = RpcClient::spawn(connector, &config.rpc);
    let sampling = SamplingHandle::new(config.rpc.sampling.clone());
    let transformer: Arc<dyn TextTransformer> =
        Arc::new(RemoteTransformer::new(rpc.clone(), sampling.clone()));

    let routes = RouteStore::open(config.routes_file()).await;
    info!(
        path = %config.routes_file(),
        routes = routes.len().await,
        "Route table loaded"
    );

    let context = Arc::new(RelayContext::new(
        config.relay.clone(),
        transformer,
        routes,
        dispatcher,
        deleter,
        sampling,
    ));
    let handler_chain = build_handler_chain(&context);

    BotComponents {
        context,
        rpc,
        handler_chain,
    }
}

/// Commands first, relay last.
pub fn build_handler_chain(ctx: &Arc<RelayContext>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(ctx.clone())))
        .add_handler(Arc::new(RelayHandler::new(RelayOrchestrator::new(
            ctx.clone(),
        ))))
}
