//! [`RpcClient`]: handle to a single worker task that owns the request/reply channel.
//!
//! Callers clone the handle freely; every request is queued as `(request, deadline, completion)`
//! and the worker answers them one at a time, so no two callers ever share an exchange.
//!
//! **Data flow:** `call` → queue → `Worker::exchange` (connect if needed → send → recv, all under
//! the job's deadline) → completion. A timed-out or failed exchange drops the channel and returns
//! the error at once; the next job connects a fresh channel before it sends.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::RpcConfig;
use crate::error::RpcError;
use crate::transport::{Channel, Connector};
use crate::wire::{self, SamplingConfig, WireRequest};

const QUEUE_CAPACITY: usize = 64;

/// Connectivity state derived from exchange outcomes and heartbeat probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

type Job = (WireRequest, Duration, oneshot::Sender<Result<Value, RpcError>>);

#[derive(Clone)]
pub struct RpcClient {
    tx: mpsc::Sender<Job>,
    available: Arc<AtomicBool>,
    request_timeout: Duration,
    heartbeat_timeout: Duration,
    origin: String,
}

impl RpcClient {
    /// Spawns the worker on the current tokio runtime. The client starts `Unavailable`; the first
    /// successful exchange or heartbeat flips it.
    pub fn spawn(connector: Arc<dyn Connector>, config: &RpcConfig) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let available = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            connector,
            channel: None,
            available: available.clone(),
            connect_timeout: config.heartbeat_timeout,
        };
        tokio::spawn(worker.run(rx));
        Self {
            tx,
            available,
            request_timeout: config.request_timeout,
            heartbeat_timeout: config.heartbeat_timeout,
            origin: config.origin.clone(),
        }
    }

    pub fn availability(&self) -> Availability {
        if self.available.load(Ordering::SeqCst) {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability() == Availability::Available
    }

    /// Queues one request and waits for its outcome. No retry on failure.
    pub async fn call(&self, request: WireRequest, timeout: Duration) -> Result<Value, RpcError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send((request, timeout, done_tx))
            .await
            .map_err(|_| RpcError::Closed)?;
        done_rx.await.map_err(|_| RpcError::Closed)?
    }

    /// Transforms `text` with `model` under the data-path deadline.
    #[instrument(skip(self, text, sampling), fields(text_len = text.len()))]
    pub async fn generate(
        &self,
        text: &str,
        model: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, RpcError> {
        let request = WireRequest::Generate {
            text: text.to_string(),
            model: model.to_string(),
            config: sampling.clone(),
            from: self.origin.clone(),
        };
        let reply = self.call(request, self.request_timeout).await?;
        wire::reply_text(reply).ok_or(RpcError::Absent)
    }

    /// Lightweight liveness probe under the heartbeat deadline.
    pub async fn ping(&self) -> Result<Value, RpcError> {
        let request = WireRequest::Ping {
            from: self.origin.clone(),
        };
        self.call(request, self.heartbeat_timeout).await
    }

    /// Starts the periodic heartbeat. The first probe fires immediately.
    pub fn spawn_heartbeat(&self, period: Duration) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match client.ping().await {
                    Ok(reply) => debug!(reply = %reply, "heartbeat ok"),
                    Err(RpcError::Closed) => {
                        info!("rpc worker gone, heartbeat stopped");
                        break;
                    }
                    Err(e) => warn!(error = %e, "heartbeat failed, transform service unavailable"),
                }
            }
        })
    }
}

/// Sole owner of the channel.
struct Worker {
    connector: Arc<dyn Connector>,
    channel: Option<Box<dyn Channel>>,
    available: Arc<AtomicBool>,
    /// Bound on the connect attempted at startup.
    connect_timeout: Duration,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::Receiver<Job>) {
        match tokio::time::timeout(self.connect_timeout, self.connector.connect()).await {
            Ok(Ok(channel)) => self.channel = Some(channel),
            Ok(Err(e)) => warn!(error = %e, "initial connect failed, will retry on first request"),
            Err(_) => warn!(
                timeout = ?self.connect_timeout,
                "initial connect timed out, will retry on first request"
            ),
        }
        while let Some((request, timeout, done)) = rx.recv().await {
            let outcome = self.exchange(&request, timeout).await;
            if done.send(outcome).is_err() {
                debug!(kind = request.kind(), "caller went away before the reply");
            }
        }
        debug!("rpc queue closed, worker exiting");
    }

    /// Connect (when no channel is held), send and recv all share the job's deadline.
    async fn exchange(&mut self, request: &WireRequest, timeout: Duration) -> Result<Value, RpcError> {
        self.set_available(true);
        let frame = wire::encode(request)?;

        let connector = &self.connector;
        let slot = &mut self.channel;
        let outcome = tokio::time::timeout(timeout, async {
            let channel = match slot.take() {
                Some(channel) => channel,
                None => connector.connect().await?,
            };
            let channel = slot.insert(channel);
            channel.send(frame).await?;
            channel.recv().await
        })
        .await;

        match outcome {
            Ok(Ok(reply)) => {
                self.set_available(true);
                wire::decode(&reply)
            }
            Ok(Err(e)) => {
                warn!(error = %e, kind = request.kind(), "transport error, dropping channel");
                self.set_available(false);
                self.discard();
                Err(e)
            }
            Err(_) => {
                warn!(?timeout, kind = request.kind(), "request timed out, dropping channel");
                self.set_available(false);
                self.discard();
                Err(RpcError::Timeout(timeout))
            }
        }
    }

    /// Drops the current channel so a late reply on it never reaches the next caller. The next
    /// exchange connects a fresh one under its own deadline.
    fn discard(&mut self) {
        self.channel = None;
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}
