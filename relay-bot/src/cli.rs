//! Command-line surface: run the bot, inspect routes, probe or exercise the transform service.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use relay_core::init_tracing;
use route_store::RouteStore;
use std::sync::Arc;
use transform_client::{RemoteTransformer, RpcClient, RpcConfig, SamplingHandle, ZmqConnector};

use crate::commands::format_route_list;
use crate::config::{routes_file_from_env, RelaySettings};
use crate::transform_chain::TransformationChain;

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "Discord relay bot: run, routes, ping, transform", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override DISCORD_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// List the persisted routes.
    Routes {
        /// Route file; defaults to ROUTES_FILE.
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Send one heartbeat to the transform service.
    Ping,
    /// Transform a text once, plus `depth` chained calls.
    Transform {
        text: String,
        #[arg(short, long)]
        model: Option<String>,
        #[arg(short, long, default_value_t = 0)]
        depth: u32,
    },
}

pub async fn handle_routes(file: Option<String>) -> Result<()> {
    let path = file.unwrap_or_else(routes_file_from_env);
    let store = RouteStore::open(&path).await;
    println!("{}", format_route_list(&store.snapshot().await));
    Ok(())
}

pub async fn handle_ping() -> Result<()> {
    init_tracing(None)?;
    let config = RpcConfig::from_env()?;
    config.validate()?;
    let client = RpcClient::spawn(Arc::new(ZmqConnector::new(config.endpoint.clone())), &config);
    match client.ping().await {
        Ok(reply) => {
            println!("{} answered: {}", config.endpoint, reply);
            Ok(())
        }
        Err(e) => bail!("{} did not answer: {}", config.endpoint, e),
    }
}

pub async fn handle_transform(text: String, model: Option<String>, depth: u32) -> Result<()> {
    init_tracing(None)?;
    let config = RpcConfig::from_env()?;
    config.validate()?;
    let model = match model {
        Some(m) => m,
        None => RelaySettings::from_env()?.default_model,
    };

    let client = RpcClient::spawn(Arc::new(ZmqConnector::new(config.endpoint.clone())), &config);
    let transformer = RemoteTransformer::new(client, SamplingHandle::new(config.sampling.clone()));
    let chain = TransformationChain::new(Arc::new(transformer));

    let outputs = chain
        .run(&text, &model, depth.min(relay_core::MAX_RECURSION_DEPTH))
        .await;
    if outputs.is_empty() {
        bail!("transform service did not answer");
    }
    for output in outputs {
        println!("{}", output);
    }
    Ok(())
}
