// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_message(id: &str, created_at: DateTime<Utc>) -> ArchivedMessageRow {
    ArchivedMessageRow {
        id: id.to_string(),
        source_module: "kalshi".to_string(),
        source_stream: None,
        created_at,
        raw_json: serde_json::json!({"id": id}),
        tags_json: None,
        from: None,
        message: Some("hi".to_string()),
    }
}

#[tokio::test]
async fn insert_if_absent_is_at_most_once() {
    let store = FakeStore::new();
    let now = Utc::now();
    assert!(store.insert_if_absent(sample_message("m-1", now)).await.unwrap());
    assert!(!store.insert_if_absent(sample_message("m-1", now)).await.unwrap());
    assert_eq!(store.message_count(), 1);
}

#[tokio::test]
async fn finalize_transitions_running_to_terminal_exactly_once() {
    let store = FakeStore::new();
    let run_id = JobRunId::from_string("run-1");
    let now = Utc::now();
    store
        .start_running(&run_id, "github", "mod_github", "collectEvents", "schedule", serde_json::json!({}), now)
        .await
        .unwrap();
    store
        .finalize(&run_id, JobRunStatus::Success, now, None, None)
        .await
        .unwrap();
    // A second finalize (e.g. a racing duplicate event) must not flip
    // an already-terminal row back to error.
    store
        .finalize(&run_id, JobRunStatus::Error, now, Some("late".to_string()), None)
        .await
        .unwrap();
    let row = store.get(&run_id).await.unwrap().unwrap();
    assert_eq!(row.status, JobRunStatus::Success);
    assert!(row.error.is_none());
}

#[tokio::test]
async fn context_upsert_bumps_version_on_repeat_apply() {
    let store = FakeStore::new();
    let now = Utc::now();
    let first = store
        .upsert("github", "repo-1", "short", "long", &[], None, now)
        .await
        .unwrap();
    assert_eq!(first.row.version, 1);
    assert!(first.created);

    let second = store
        .upsert("github", "repo-1", "short", "long", &[], None, now)
        .await
        .unwrap();
    assert_eq!(second.row.version, 2);
    assert!(!second.created);
}

#[tokio::test]
async fn replay_candidates_exclude_deduped_messages() {
    let store = FakeStore::new();
    let now = Utc::now();
    store.seed_message(sample_message("m-1", now));
    store.seed_message(sample_message("m-2", now));
    store.mark_emitted("m-1", now).await.unwrap();

    let candidates = store
        .select_replay_candidates(now - chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "m-2");
}
