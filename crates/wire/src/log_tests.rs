// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_event_carries_fixed_module_and_source() {
    let event = WorkerLogEvent::new(LogLevel::Info, Utc::now(), "boot complete");
    assert_eq!(event.module, "worker");
    assert_eq!(event.source, "process");
}

#[test]
fn level_serializes_lowercase() {
    let json = serde_json::to_value(LogLevel::Warn).unwrap();
    assert_eq!(json, serde_json::json!("warn"));
}
