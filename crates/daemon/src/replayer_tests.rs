// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use feedeater_bus::FakeBus;
use feedeater_storage::{ArchivedMessageRow, FakeStore};

fn row(id: &str, module: &str, created_at: DateTime<Utc>) -> ArchivedMessageRow {
    ArchivedMessageRow {
        id: id.to_string(),
        source_module: module.to_string(),
        source_stream: None,
        created_at,
        raw_json: serde_json::json!({
            "id": id,
            "createdAt": created_at,
            "source": {"module": module},
            "Message": "hi",
            "isDirectMention": false,
            "isDigest": false,
            "isSystemMessage": false,
        }),
        tags_json: None,
        from: None,
        message: Some("hi".to_string()),
    }
}

#[tokio::test]
async fn replays_recent_messages_exactly_once_then_skips_them() {
    let bus = FakeBus::new();
    let store = FakeStore::new();
    let now = Utc::now();
    store.seed_message(row("m-1", "kalshi", now));
    store.seed_message(row("m-2", "github", now));
    store.seed_message(row("m-3", "kalshi", now - Duration::hours(2)));

    run(&bus, &store, now, 60).await;

    assert_eq!(bus.published().len(), 2);
    assert_eq!(store.dedupe_count(), 2);

    run(&bus, &store, now, 60).await;
    assert_eq!(bus.published().len(), 2, "second startup must not re-emit already-dedupe-marked messages");
}

#[tokio::test]
async fn replayed_message_carries_realtime_false() {
    let bus = FakeBus::new();
    let store = FakeStore::new();
    let now = Utc::now();
    store.seed_message(row("m-1", "kalshi", now));

    run(&bus, &store, now, 60).await;

    let published = bus.published_on("feedeater.kalshi.messageCreated");
    assert_eq!(published.len(), 1);
    let envelope: MessageCreatedEnvelope = serde_json::from_slice(&published[0].payload).unwrap();
    assert_eq!(envelope.message.realtime, Some(false));
    assert_eq!(envelope.message.id, "m-1");
}
