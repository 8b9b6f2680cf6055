//! Wiring test for [`relay_bot::build_components_with`]: config → context → handler chain, with
//! a transport that never connects.

mod common;

use async_trait::async_trait;
use relay_bot::{build_components_with, BaseConfig, BotConfig, RelaySettings};
use relay_core::HandlerResponse;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use transform_client::{Channel, Connector, RpcConfig, RpcError};

struct Unreachable;

#[async_trait]
impl Connector for Unreachable {
    async fn connect(&self) -> Result<Box<dyn Channel>, RpcError> {
        Err(RpcError::Transport("connection refused".to_string()))
    }
}

/// Connector whose attempts never complete, like a zmq connect to a host that never answers.
struct Silent;

#[async_trait]
impl Connector for Silent {
    async fn connect(&self) -> Result<Box<dyn Channel>, RpcError> {
        std::future::pending().await
    }
}

fn config(dir: &TempDir) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            discord_token: "token".to_string(),
            webhook_api_url: "https://discord.com/api/v10".to_string(),
            log_file: dir.path().join("bot.log").display().to_string(),
            routes_file: dir.path().join("routes.json").display().to_string(),
        },
        rpc: RpcConfig::default(),
        relay: RelaySettings::default(),
    }
}

/// **Test: Components start unavailable and never relay until the service answers.**
///
/// **Setup:** Route file with one channel route; transport that refuses every connection.
/// **Expected:** `!status` reports unavailable and one route; an ordinary message is matched by
/// nothing because the relay is skipped, so nothing is posted.
#[tokio::test]
async fn test_components_wiring_without_service() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    {
        let store = route_store::RouteStore::open(config.routes_file()).await;
        store.toggle(common::channel_route(7, 0, true)).await.unwrap();
    }

    let dispatcher = Arc::new(common::RecordingDispatcher::default());
    let deleter = Arc::new(common::RecordingDeleter::default());
    let components =
        build_components_with(&config, Arc::new(Unreachable), dispatcher.clone(), deleter).await;

    assert_eq!(components.handler_chain.len(), 2);
    assert!(!components.rpc.is_available());

    let status = match components
        .handler_chain
        .handle(&common::message("!status"))
        .await
        .unwrap()
    {
        HandlerResponse::Reply(text) => text,
        other => panic!("expected reply, got {:?}", other),
    };
    assert!(status.contains("Transform service: unavailable"));
    assert!(status.contains("Routes: 1"));

    let response = components
        .handler_chain
        .handle(&common::message("HI"))
        .await
        .unwrap();
    assert_eq!(response, HandlerResponse::Continue);
    assert!(dispatcher.posts().is_empty());
}

/// **Test: A service that never accepts the connection still yields a bounded ping.**
///
/// **Setup:** Transport whose connect never completes; default rpc deadlines.
/// **Expected:** The ping fails with the heartbeat timeout instead of hanging, and the client
/// stays unavailable.
#[tokio::test]
async fn test_components_ping_bounded_when_connect_hangs() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let dispatcher = Arc::new(common::RecordingDispatcher::default());
    let deleter = Arc::new(common::RecordingDeleter::default());
    let components = build_components_with(&config, Arc::new(Silent), dispatcher, deleter).await;

    let heartbeat_timeout = config.rpc.heartbeat_timeout;
    let bound = heartbeat_timeout * 4 + Duration::from_secs(1);
    let err = tokio::time::timeout(bound, components.rpc.ping())
        .await
        .expect("ping must finish within its own deadline")
        .unwrap_err();

    assert_eq!(err, RpcError::Timeout(heartbeat_timeout));
    assert!(!components.rpc.is_available());
}
