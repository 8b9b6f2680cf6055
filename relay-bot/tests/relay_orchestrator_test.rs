//! Integration tests for [`relay_bot::RelayOrchestrator`] over mock transformer, dispatcher and
//! deleter, with routes in a temp-dir route file.
//!
//! Covers: chained outputs posted in order, failed steps skipped, skipping while unavailable,
//! disabled routes, loop prevention, identity cache reuse, deletion of originals, per-route
//! failure isolation, and release of the busy state.

mod common;

use common::{channel_route, harness, message, AUTHOR, CHANNEL};
use relay_bot::RelayOrchestrator;

/// **Test: Depth 2 relays three chained outputs, in order, with the transformed identity.**
///
/// **Setup:** One enabled channel route, depth 2, original kept; transformer appends "!".
/// **Action:** Relay "HI" from author "bob".
/// **Expected:** Three posts "HI!", "HI!!", "HI!!!" wrapped as links to the original; username
/// "bob!"; avatar of the author.
#[tokio::test]
async fn test_chained_outputs_posted_in_order() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 2, false)).await.unwrap();

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(report.routes_matched, 1);
    assert_eq!(report.payloads_sent, 3);
    let link = "(https://discord.com/channels/20/10/1000)";
    assert_eq!(
        h.dispatcher.contents(),
        vec![
            format!("[HI!]{}", link),
            format!("[HI!!]{}", link),
            format!("[HI!!!]{}", link),
        ]
    );
    let posts = h.dispatcher.posts();
    assert!(posts.iter().all(|(id, secret, p)| {
        *id == 7
            && secret == "token-7"
            && p.username == "bob!"
            && p.avatar_url.as_deref() == Some("https://cdn.example/bob.png")
    }));
}

/// **Test: A timeout mid-chain leaves only the outputs produced before it.**
///
/// **Setup:** Depth 2; the second transform call (first chained step) times out.
/// **Expected:** Exactly one post with the first output; no crash.
#[tokio::test]
async fn test_timeout_mid_chain_yields_single_output() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 2, true)).await.unwrap();
    h.transformer.fail_on(&[1]);

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(report.payloads_sent, 1);
    assert_eq!(h.dispatcher.contents(), vec!["HI!".to_string()]);
}

/// **Test: A failed initial transform relays nothing.**
#[tokio::test]
async fn test_initial_failure_posts_nothing() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 3, true)).await.unwrap();
    h.transformer.fail_on(&[0]);

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(report.payloads_sent, 0);
    assert!(h.dispatcher.posts().is_empty());
}

/// **Test: Nothing happens while the transform service is unavailable.**
#[tokio::test]
async fn test_unavailable_service_skips_message() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 0, true)).await.unwrap();
    h.transformer.set_available(false);

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert!(report.skipped);
    assert_eq!(h.transformer.call_count(), 0);
    assert!(h.dispatcher.posts().is_empty());
    assert!(h.deleter.deleted.lock().unwrap().is_empty());
}

/// **Test: A disabled route is never used.**
#[tokio::test]
async fn test_disabled_route_not_relayed() {
    let h = harness().await;
    let route = channel_route(7, 0, true);
    h.ctx.routes.toggle(route.clone()).await.unwrap();
    h.ctx.routes.toggle(route).await.unwrap();

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(report.routes_matched, 0);
    assert_eq!(h.transformer.call_count(), 0);
}

/// **Test: The relay's own webhook output is not relayed again.**
///
/// **Setup:** Two routes; the message carries the webhook id of the second route's endpoint.
/// **Expected:** No route matches, even the first one.
#[tokio::test]
async fn test_loop_prevention() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 0, true)).await.unwrap();
    h.ctx.routes.toggle(channel_route(8, 0, true)).await.unwrap();
    let mut looped = message("HI!");
    looped.webhook_id = Some(8);

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&looped).await;

    assert_eq!(report.routes_matched, 0);
    assert!(h.dispatcher.posts().is_empty());
}

/// **Test: A cached identity is not transformed again.**
///
/// **Setup:** Depth 0 route. **Action:** Relay two messages from the same author.
/// **Expected:** First message: 2 calls (text + identity); second: 1 call (text only).
#[tokio::test]
async fn test_identity_cache_hit_skips_rpc() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 0, true)).await.unwrap();
    let orchestrator = RelayOrchestrator::new(h.ctx.clone());

    orchestrator.relay(&message("one")).await;
    assert_eq!(h.transformer.call_count(), 2);
    orchestrator.relay(&message("two")).await;
    assert_eq!(h.transformer.call_count(), 3);

    assert_eq!(h.ctx.identities.get("bob").await.as_deref(), Some("bob!"));
}

/// **Test: delete_original removes the source and posts plain text.**
#[tokio::test]
async fn test_delete_original() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 0, true)).await.unwrap();

    RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(*h.deleter.deleted.lock().unwrap(), vec![(CHANNEL, 1000)]);
    assert_eq!(h.dispatcher.contents(), vec!["HI!".to_string()]);
}

/// **Test: One route's dispatch failure does not affect another route.**
///
/// **Setup:** A channel route to endpoint 7 (failing) and an author route to endpoint 9.
/// **Expected:** Only endpoint 9 receives a post; the report counts one delivered payload.
#[tokio::test]
async fn test_route_failure_isolated() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 0, true)).await.unwrap();
    let mut author_route = channel_route(9, 0, true);
    author_route.source_channel = None;
    author_route.source_author = Some(AUTHOR);
    author_route.key = "author:30->9".to_string();
    h.ctx.routes.toggle(author_route).await.unwrap();
    h.dispatcher.failing.lock().unwrap().push(7);

    let report = RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert_eq!(report.routes_matched, 2);
    assert_eq!(report.payloads_sent, 1);
    let posts = h.dispatcher.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, 9);
}

/// **Test: Masked words reach the transformer as sentinels.**
#[tokio::test]
async fn test_mask_words_applied_before_first_call() {
    let h = harness().await;
    let mut route = channel_route(7, 0, true);
    route.mask_words = 10;
    h.ctx.routes.toggle(route).await.unwrap();

    RelayOrchestrator::new(h.ctx.clone()).relay(&message("hello big world")).await;

    let inputs = h.transformer.inputs.lock().unwrap().clone();
    assert_eq!(inputs[0], "<extra_id_0> <extra_id_1> <extra_id_2>");
}

/// **Test: The busy state is held only while a message is relayed.**
#[tokio::test]
async fn test_busy_released_after_relay() {
    let h = harness().await;
    h.ctx.routes.toggle(channel_route(7, 1, false)).await.unwrap();

    RelayOrchestrator::new(h.ctx.clone()).relay(&message("HI")).await;

    assert!(!h.ctx.busy.is_busy());
}
