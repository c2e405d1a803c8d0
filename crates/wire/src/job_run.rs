// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical `JobRunEvent` wire type published on
//! `feedeater.jobs.<module>.<queue>.<job>` (spec §3, §4.7).

use chrono::{DateTime, Utc};
use feedeater_core::JobRunId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Trigger;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRunEvent {
    #[serde(rename = "type")]
    pub kind: JobRunEventKind,
    pub module: String,
    pub queue: String,
    pub job: String,
    #[serde(rename = "requestedAt")]
    pub requested_at: DateTime<Utc>,
    #[serde(rename = "runId", skip_serializing_if = "Option::is_none")]
    pub run_id: Option<JobRunId>,
    pub trigger: Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobRunEventKind {
    JobRun,
}

impl JobRunEvent {
    pub fn new(module: impl Into<String>, queue: impl Into<String>, job: impl Into<String>, requested_at: DateTime<Utc>, trigger: Trigger) -> Self {
        Self {
            kind: JobRunEventKind::JobRun,
            module: module.into(),
            queue: queue.into(),
            job: job.into(),
            requested_at,
            run_id: None,
            trigger,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// `runId` is assigned if absent (spec §3). Call this once, at decode
    /// time, so every downstream consumer sees a concrete id.
    pub fn run_id_or_assign(&mut self) -> JobRunId {
        match &self.run_id {
            Some(id) => id.clone(),
            None => {
                let id = JobRunId::new();
                self.run_id = Some(id.clone());
                id
            }
        }
    }
}

#[cfg(test)]
#[path = "job_run_tests.rs"]
mod tests;
