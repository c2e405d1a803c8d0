// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use feedeater_bus::FakeBus;
use feedeater_storage::FakeStore;
use feedeater_wire::{MessageCreatedEnvelope, MessageSource, NormalizedMessage};

fn sample(id: &str, module: &str) -> NormalizedMessage {
    NormalizedMessage {
        id: id.to_string(),
        created_at: Utc::now(),
        source: MessageSource { module: module.to_string(), stream: None },
        message: "hello".to_string(),
        from: None,
        is_direct_mention: false,
        is_digest: false,
        is_system_message: false,
        likes: None,
        tags: None,
        context_ref: None,
        follow_me_panel: None,
        realtime: None,
    }
}

#[tokio::test]
async fn archives_envelope_and_bare_payloads_exactly_once() {
    let bus = Arc::new(FakeBus::new());
    let store = Arc::new(FakeStore::new());
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(run(bus.clone(), store.clone(), cancel.clone()));

    bus.publish(
        "feedeater.kalshi.messageCreated",
        serde_json::to_vec(&MessageCreatedEnvelope::wrap(sample("m-1", "kalshi"))).unwrap(),
    )
    .await
    .unwrap();
    bus.publish(
        "feedeater.github.messageCreated",
        serde_json::to_vec(&sample("m-2", "github")).unwrap(),
    )
    .await
    .unwrap();
    // Duplicate id must not double-archive.
    bus.publish(
        "feedeater.kalshi.messageCreated",
        serde_json::to_vec(&MessageCreatedEnvelope::wrap(sample("m-1", "kalshi"))).unwrap(),
    )
    .await
    .unwrap();

    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(store.message_count(), 2);
}

#[tokio::test]
async fn malformed_payload_is_dropped_without_stopping_the_loop() {
    let bus = Arc::new(FakeBus::new());
    let store = Arc::new(FakeStore::new());
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(run(bus.clone(), store.clone(), cancel.clone()));

    bus.publish("feedeater.kalshi.messageCreated", b"not json".to_vec()).await.unwrap();
    bus.publish(
        "feedeater.kalshi.messageCreated",
        serde_json::to_vec(&sample("m-1", "kalshi")).unwrap(),
    )
    .await
    .unwrap();

    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(store.message_count(), 1);
}
