//! Outcome taxonomy of one RPC exchange.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// No reply within the deadline. The channel has been rebuilt.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// Connection-level failure. The channel has been rebuilt.
    #[error("transport error: {0}")]
    Transport(String),

    /// Service reachable but returned nothing usable.
    #[error("service returned no usable text")]
    Absent,

    #[error("malformed payload: {0}")]
    Codec(String),

    /// The worker owning the channel has shut down.
    #[error("rpc worker stopped")]
    Closed,
}

impl RpcError {
    /// True for the failures that mark the client unavailable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RpcError::Timeout(_) | RpcError::Transport(_))
    }
}
