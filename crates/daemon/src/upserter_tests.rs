// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use feedeater_storage::FakeStore;
use feedeater_wire::{ContextPayload, ContextUpdatedEvent, ContextUpdatedKind};

fn event(owner_module: &str, message_id: Option<&str>, embedding: Option<Vec<f32>>) -> ContextUpdatedEvent {
    ContextUpdatedEvent {
        kind: ContextUpdatedKind::ContextUpdated,
        created_at: Utc::now(),
        message_id: message_id.map(|s| s.to_string()),
        context: ContextPayload {
            owner_module: owner_module.to_string(),
            source_key: None,
            summary_short: "a".repeat(200),
            summary_long: "long".to_string(),
            key_points: Some(vec!["point".to_string()]),
            embedding,
        },
    }
}

#[tokio::test]
async fn source_key_defaults_to_message_id_and_summary_is_truncated() {
    let store = FakeStore::new();
    apply(&store, 4096, event("github", Some("m-1"), None)).await.unwrap();

    let row = store.get("github", "m-1").await.unwrap().unwrap();
    assert_eq!(row.summary_short.chars().count(), 128);
    assert_eq!(row.version, 1);
}

#[tokio::test]
async fn mismatched_embedding_length_is_persisted_as_null() {
    let store = FakeStore::new();
    apply(&store, 4096, event("github", Some("m-2"), Some(vec![0.1; 768]))).await.unwrap();

    let row = store.get("github", "m-2").await.unwrap().unwrap();
    assert!(row.embedding.is_none());
}

#[tokio::test]
async fn matching_embedding_length_is_persisted() {
    let store = FakeStore::new();
    apply(&store, 3, event("github", Some("m-3"), Some(vec![0.1, 0.2, 0.3]))).await.unwrap();

    let row = store.get("github", "m-3").await.unwrap().unwrap();
    assert_eq!(row.embedding, Some(vec![0.1, 0.2, 0.3]));
}

#[tokio::test]
async fn repeated_apply_bumps_version_and_links_message() {
    let store = FakeStore::new();
    apply(&store, 4096, event("github", Some("m-4"), None)).await.unwrap();
    apply(&store, 4096, event("github", Some("m-4"), None)).await.unwrap();

    let row = store.get("github", "m-4").await.unwrap().unwrap();
    assert_eq!(row.version, 2);
}

#[tokio::test]
async fn missing_message_id_and_source_key_generates_a_fresh_uuid() {
    let store = FakeStore::new();
    apply(&store, 4096, event("github", None, None)).await.unwrap();
    // No stable key to look up by, but the call must succeed without panicking.
}
