//! Shared mocks for relay-bot integration tests: a scripted transformer, recording dispatcher
//! and deleter, and builders for messages and contexts.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use relay_bot::{RelayContext, RelaySettings};
use relay_core::{
    Author, InboundMessage, MessageDeleter, OutputDispatcher, RelayError, RelayPayload, Route,
    RouteKind, WebhookEndpoint,
};
use route_store::RouteStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use transform_client::{RpcError, SamplingHandle, TextTransformer};

/// Appends "!" to every input. Calls listed in `fail_on` (0-based, counted across all callers)
/// time out instead.
pub struct MockTransformer {
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
    pub fail_on: Mutex<Vec<usize>>,
    pub available: AtomicBool,
}

impl MockTransformer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
            fail_on: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        })
    }

    pub fn fail_on(&self, calls: &[usize]) {
        *self.fail_on.lock().unwrap() = calls.to_vec();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl TextTransformer for MockTransformer {
    async fn transform(&self, text: &str, _model: &str) -> Result<String, RpcError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        if self.fail_on.lock().unwrap().contains(&n) {
            return Err(RpcError::Timeout(Duration::from_millis(30_000)));
        }
        Ok(format!("{}!", text))
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Records every post; posts to endpoints in `failing` return an error.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub posts: Mutex<Vec<(u64, String, RelayPayload)>>,
    pub failing: Mutex<Vec<u64>>,
}

impl RecordingDispatcher {
    pub fn posts(&self) -> Vec<(u64, String, RelayPayload)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.posts().into_iter().map(|(_, _, p)| p.content).collect()
    }
}

#[async_trait]
impl OutputDispatcher for RecordingDispatcher {
    async fn post(
        &self,
        endpoint_id: u64,
        endpoint_secret: &str,
        payload: &RelayPayload,
    ) -> relay_core::Result<()> {
        if self.failing.lock().unwrap().contains(&endpoint_id) {
            return Err(RelayError::Dispatch("webhook gone".to_string()));
        }
        self.posts
            .lock()
            .unwrap()
            .push((endpoint_id, endpoint_secret.to_string(), payload.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDeleter {
    pub deleted: Mutex<Vec<(u64, u64)>>,
}

#[async_trait]
impl MessageDeleter for RecordingDeleter {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> relay_core::Result<()> {
        self.deleted.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }
}

pub struct Harness {
    pub ctx: Arc<RelayContext>,
    pub transformer: Arc<MockTransformer>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub deleter: Arc<RecordingDeleter>,
    pub dir: TempDir,
}

pub async fn harness_with(settings: RelaySettings) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = RouteStore::open(dir.path().join("routes.json")).await;
    let transformer = MockTransformer::new();
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let deleter = Arc::new(RecordingDeleter::default());
    let ctx = Arc::new(RelayContext::new(
        settings,
        transformer.clone(),
        store,
        dispatcher.clone(),
        deleter.clone(),
        SamplingHandle::default(),
    ));
    Harness {
        ctx,
        transformer,
        dispatcher,
        deleter,
        dir,
    }
}

pub async fn harness() -> Harness {
    harness_with(RelaySettings::default()).await
}

pub const CHANNEL: u64 = 10;
pub const GUILD: u64 = 20;
pub const AUTHOR: u64 = 30;

pub fn message(content: &str) -> InboundMessage {
    InboundMessage {
        id: 1000,
        channel_id: CHANNEL,
        guild_id: Some(GUILD),
        author: Author {
            id: AUTHOR,
            name: "bob".to_string(),
            display_name: None,
            avatar_url: Some("https://cdn.example/bob.png".to_string()),
        },
        content: content.to_string(),
        webhook_id: None,
        link: "https://discord.com/channels/20/10/1000".to_string(),
        created_at: Utc::now(),
    }
}

pub fn channel_route(endpoint_id: u64, depth: u32, delete_original: bool) -> Route {
    let mut route = Route::new(
        RouteKind::Channel,
        CHANNEL,
        99,
        WebhookEndpoint {
            id: endpoint_id,
            token: format!("token-{}", endpoint_id),
        },
        "test-model",
    );
    route.set_recursion_depth(depth);
    route.delete_original = delete_original;
    route
}
