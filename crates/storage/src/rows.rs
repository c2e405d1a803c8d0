// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row types for the tables the worker owns (spec §3, §6 "Persisted tables").

use chrono::{DateTime, Utc};
use feedeater_core::JobRunId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobRunStatus {
    Running,
    Success,
    Error,
}

impl JobRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobRunStatus::Running => "running",
            JobRunStatus::Success => "success",
            JobRunStatus::Error => "error",
        }
    }
}

/// `job_runs` row (spec §3 "Job run row"). Created at dispatch, finalized by
/// the dispatcher, never mutated afterward once terminal.
#[derive(Debug, Clone)]
pub struct JobRunRow {
    pub id: JobRunId,
    pub module: String,
    pub queue: String,
    pub job: String,
    pub status: JobRunStatus,
    pub trigger_type: String,
    pub trigger_json: Value,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub metrics_json: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `job_states` row (spec §3 "Job state row"), one per `(module, job)`.
#[derive(Debug, Clone)]
pub struct JobStateRow {
    pub module: String,
    pub job: String,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_metrics: Option<Value>,
}

/// `bus_messages` row (spec §3 "Archived message row").
#[derive(Debug, Clone)]
pub struct ArchivedMessageRow {
    pub id: String,
    pub source_module: String,
    pub source_stream: Option<String>,
    pub created_at: DateTime<Utc>,
    pub raw_json: Value,
    pub tags_json: Option<Value>,
    pub from: Option<String>,
    pub message: Option<String>,
}

/// `bus_reemit_dedupe` row (spec §3 "Replay dedupe row").
#[derive(Debug, Clone)]
pub struct DedupeRow {
    pub message_id: String,
    pub last_emitted_at: DateTime<Utc>,
}

/// `bus_contexts` row (spec §3 "Context row"). `(owner_module, source_key)` unique.
#[derive(Debug, Clone)]
pub struct ContextRow {
    pub id: String,
    pub owner_module: String,
    pub source_key: String,
    pub summary_short: String,
    pub summary_long: String,
    pub key_points: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `bus_context_messages` row (spec §3 "Context-message link"). Created only
/// when a `ContextUpdated` event carries a `messageId`.
#[derive(Debug, Clone)]
pub struct ContextMessageLink {
    pub context_id: String,
    pub message_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "rows_tests.rs"]
mod tests;
