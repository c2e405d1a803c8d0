// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn error_response_without_error_field_gets_default_message() {
    let response = WireResponse {
        ok: false,
        metrics: None,
        enqueue: Vec::new(),
        error: None,
    };
    assert!(response.into_outcome().is_err());
}

#[test]
fn ok_response_carries_metrics_and_enqueues() {
    let response: WireResponse = serde_json::from_str(
        r#"{"ok": true, "metrics": {"n": 3}, "enqueue": [{"jobName": "followUp", "data": {"x": 1}}]}"#,
    )
    .unwrap();
    let outcome = response.into_outcome().unwrap();
    assert_eq!(outcome.metrics, Some(serde_json::json!({"n": 3})));
    assert_eq!(outcome.enqueue.len(), 1);
    assert_eq!(outcome.enqueue[0].job_name, "followUp");
}
