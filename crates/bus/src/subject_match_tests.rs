// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn greater_than_matches_remaining_tokens() {
    assert!(subject_matches("feedeater.jobs.>", "feedeater.jobs.github.mod_github.collectEvents"));
    assert!(subject_matches("feedeater.jobs.>", "feedeater.jobs.github"));
    assert!(!subject_matches("feedeater.jobs.>", "feedeater.other.github"));
}

#[test]
fn star_matches_exactly_one_token() {
    assert!(subject_matches("feedeater.*.contextUpdated", "feedeater.github.contextUpdated"));
    assert!(!subject_matches("feedeater.*.contextUpdated", "feedeater.github.extra.contextUpdated"));
}

#[test]
fn exact_subject_matches_itself() {
    assert!(subject_matches("feedeater.worker.log", "feedeater.worker.log"));
    assert!(!subject_matches("feedeater.worker.log", "feedeater.worker.logs"));
}
