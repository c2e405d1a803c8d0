// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_full_manifest() {
    let manifest = parse_manifest(
        r#"{
            "name": "github",
            "jobs": [
                {"name": "collectEvents", "queue": "mod_github", "schedule": "*/15 * * * *"},
                {"name": "onMention", "queue": "mod_github", "triggeredBy": "feedeater.slack.messageCreated"}
            ],
            "runtime": {"entry": "./entry.js"}
        }"#,
    )
    .unwrap();

    assert_eq!(manifest.name, "github");
    assert_eq!(manifest.jobs.len(), 2);
    assert_eq!(manifest.jobs[0].schedule.as_deref(), Some("*/15 * * * *"));
    assert_eq!(
        manifest.jobs[1].triggered_by.as_deref(),
        Some("feedeater.slack.messageCreated")
    );
    assert_eq!(manifest.runtime.unwrap().entry, "./entry.js");
}

#[test]
fn manifest_without_runtime_has_no_entry() {
    let manifest = parse_manifest(r#"{"name": "noop", "jobs": []}"#).unwrap();
    assert!(manifest.runtime.is_none());
}

#[test]
fn rejects_malformed_json() {
    assert!(parse_manifest("{not json").is_err());
}
