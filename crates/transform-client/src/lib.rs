//! # Transform client
//!
//! Client for the remote text-transform service: a strict request/reply RPC channel owned by a
//! single worker task, with per-request deadlines, channel rebuild after failures, availability
//! tracking and a heartbeat probe.
//!
//! [`TextTransformer`] is the seam used by the relay; [`RemoteTransformer`] implements it over
//! [`RpcClient`].

use async_trait::async_trait;

mod client;
mod config;
mod error;
mod remote;
mod transport;
pub mod wire;

pub use client::{Availability, RpcClient};
pub use config::RpcConfig;
pub use error::RpcError;
pub use remote::{RemoteTransformer, SamplingHandle};
pub use transport::{Channel, Connector, ZmqConnector};
pub use wire::{SamplingConfig, WireRequest};

/// Turns one text into another with the named model.
#[async_trait]
pub trait TextTransformer: Send + Sync {
    /// One remote call. Errors are outcomes for the caller to interpret, never retried here.
    async fn transform(&self, text: &str, model: &str) -> Result<String, RpcError>;

    /// Whether new work should be attempted at all.
    fn is_available(&self) -> bool {
        true
    }
}
