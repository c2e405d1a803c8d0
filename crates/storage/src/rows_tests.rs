// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_run_status_renders_spec_strings() {
    assert_eq!(JobRunStatus::Running.as_str(), "running");
    assert_eq!(JobRunStatus::Success.as_str(), "success");
    assert_eq!(JobRunStatus::Error.as_str(), "error");
}
