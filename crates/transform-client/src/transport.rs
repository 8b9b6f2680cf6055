//! Strict request/reply channel to the transform service.
//!
//! [`Connector`] builds fresh channels; the client worker calls it on startup and after every
//! failed exchange. [`ZmqConnector`] is the production implementation (ZeroMQ REQ socket).

use async_trait::async_trait;
use tracing::debug;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::error::RpcError;

/// One request/reply channel. A request must be answered before the next one is sent.
#[async_trait]
pub trait Channel: Send {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), RpcError>;
    async fn recv(&mut self) -> Result<Vec<u8>, RpcError>;
}

/// Factory for channels. Each call returns a brand-new channel.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Channel>, RpcError>;
}

/// Connects ZeroMQ REQ sockets to a fixed endpoint (e.g. `tcp://127.0.0.1:5556`).
pub struct ZmqConnector {
    endpoint: String,
}

impl ZmqConnector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Connector for ZmqConnector {
    async fn connect(&self) -> Result<Box<dyn Channel>, RpcError> {
        let mut socket = ReqSocket::new();
        socket
            .connect(&self.endpoint)
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        debug!(endpoint = %self.endpoint, "REQ socket connected");
        Ok(Box::new(ZmqChannel { socket }))
    }
}

struct ZmqChannel {
    socket: ReqSocket,
}

#[async_trait]
impl Channel for ZmqChannel {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), RpcError> {
        self.socket
            .send(ZmqMessage::from(frame))
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Vec<u8>, RpcError> {
        let message = self
            .socket
            .recv()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let mut frame = Vec::new();
        for part in message.into_vec() {
            frame.extend_from_slice(&part);
        }
        Ok(frame)
    }
}
