// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn schedule_trigger_serializes_without_subject_or_message_id() {
    let json = serde_json::to_value(Trigger::schedule()).unwrap();
    assert_eq!(json, serde_json::json!({"type": "schedule"}));
}

#[test]
fn internal_trigger_carries_subject_internal() {
    let json = serde_json::to_value(Trigger::internal()).unwrap();
    assert_eq!(json, serde_json::json!({"type": "event", "subject": "internal"}));
}

#[test]
fn event_trigger_carries_subject_and_message_id() {
    let t = Trigger::event("feedeater.kalshi.messageCreated", "m-1");
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "event",
            "subject": "feedeater.kalshi.messageCreated",
            "messageId": "m-1",
        })
    );
}
