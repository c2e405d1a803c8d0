// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake store for component and integration tests. No network, no
//! database — each table is a `parking_lot::Mutex`-guarded map, following the
//! adapter/fake split used for bus and settings clients.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedeater_core::JobRunId;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::StorageError;
use crate::repo::{
    ContextRepository, ContextUpsertResult, DedupeRepository, JobRunRepository,
    JobStateRepository, MessageRepository,
};
use crate::rows::{ArchivedMessageRow, ContextRow, JobRunRow, JobRunStatus, JobStateRow};

#[derive(Default)]
pub struct FakeStore {
    job_runs: Mutex<HashMap<String, JobRunRow>>,
    job_states: Mutex<HashMap<(String, String), JobStateRow>>,
    messages: Mutex<HashMap<String, ArchivedMessageRow>>,
    dedupe: Mutex<HashMap<String, DateTime<Utc>>>,
    contexts: Mutex<HashMap<(String, String), ContextRow>>,
    links: Mutex<Vec<(String, String)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn dedupe_count(&self) -> usize {
        self.dedupe.lock().len()
    }

    pub fn seed_message(&self, row: ArchivedMessageRow) {
        self.messages.lock().insert(row.id.clone(), row);
    }
}

#[async_trait]
impl JobRunRepository for FakeStore {
    async fn start_running(
        &self,
        run_id: &JobRunId,
        module: &str,
        queue: &str,
        job: &str,
        trigger_type: &str,
        trigger_json: Value,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut runs = self.job_runs.lock();
        runs.entry(run_id.as_str().to_string()).or_insert_with(|| JobRunRow {
            id: run_id.clone(),
            module: module.to_string(),
            queue: queue.to_string(),
            job: job.to_string(),
            status: JobRunStatus::Running,
            trigger_type: trigger_type.to_string(),
            trigger_json,
            started_at,
            finished_at: None,
            error: None,
            metrics_json: None,
            created_at: started_at,
            updated_at: started_at,
        });
        Ok(())
    }

    async fn finalize(
        &self,
        run_id: &JobRunId,
        status: JobRunStatus,
        finished_at: DateTime<Utc>,
        error: Option<String>,
        metrics_json: Option<Value>,
    ) -> Result<(), StorageError> {
        let mut runs = self.job_runs.lock();
        if let Some(row) = runs.get_mut(run_id.as_str()) {
            if row.status == JobRunStatus::Running {
                row.status = status;
                row.finished_at = Some(finished_at);
                row.error = error;
                row.metrics_json = metrics_json;
                row.updated_at = finished_at;
            }
        }
        Ok(())
    }

    async fn get(&self, run_id: &JobRunId) -> Result<Option<JobRunRow>, StorageError> {
        Ok(self.job_runs.lock().get(run_id.as_str()).cloned())
    }
}

#[async_trait]
impl JobStateRepository for FakeStore {
    async fn touch_running(&self, module: &str, job: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut states = self.job_states.lock();
        let entry = states.entry((module.to_string(), job.to_string())).or_insert_with(|| JobStateRow {
            module: module.to_string(),
            job: job.to_string(),
            last_run_at: None,
            last_success_at: None,
            last_error_at: None,
            last_error: None,
            last_metrics: None,
        });
        entry.last_run_at = Some(at);
        Ok(())
    }

    async fn record_success(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        metrics_json: Option<Value>,
    ) -> Result<(), StorageError> {
        let mut states = self.job_states.lock();
        let entry = states.entry((module.to_string(), job.to_string())).or_insert_with(|| {
            JobStateRow {
                module: module.to_string(),
                job: job.to_string(),
                last_run_at: None,
                last_success_at: None,
                last_error_at: None,
                last_error: None,
                last_metrics: None,
            }
        });
        entry.last_run_at = Some(at);
        entry.last_success_at = Some(at);
        entry.last_error = None;
        entry.last_error_at = None;
        entry.last_metrics = metrics_json;
        Ok(())
    }

    async fn record_error(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        error: String,
    ) -> Result<(), StorageError> {
        let mut states = self.job_states.lock();
        let entry = states.entry((module.to_string(), job.to_string())).or_insert_with(|| {
            JobStateRow {
                module: module.to_string(),
                job: job.to_string(),
                last_run_at: None,
                last_success_at: None,
                last_error_at: None,
                last_error: None,
                last_metrics: None,
            }
        });
        entry.last_run_at = Some(at);
        entry.last_error_at = Some(at);
        entry.last_error = Some(error);
        Ok(())
    }

    async fn get(&self, module: &str, job: &str) -> Result<Option<JobStateRow>, StorageError> {
        Ok(self.job_states.lock().get(&(module.to_string(), job.to_string())).cloned())
    }
}

#[async_trait]
impl MessageRepository for FakeStore {
    async fn insert_if_absent(&self, row: ArchivedMessageRow) -> Result<bool, StorageError> {
        let mut messages = self.messages.lock();
        if messages.contains_key(&row.id) {
            return Ok(false);
        }
        messages.insert(row.id.clone(), row);
        Ok(true)
    }

    async fn select_replay_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ArchivedMessageRow>, StorageError> {
        let messages = self.messages.lock();
        let dedupe = self.dedupe.lock();
        let mut candidates: Vec<ArchivedMessageRow> = messages
            .values()
            .filter(|m| m.created_at >= cutoff && !dedupe.contains_key(&m.id))
            .cloned()
            .collect();
        candidates.sort_by_key(|m| m.created_at);
        Ok(candidates)
    }
}

#[async_trait]
impl DedupeRepository for FakeStore {
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut dedupe = self.dedupe.lock();
        let before = dedupe.len();
        dedupe.retain(|_, last_emitted_at| *last_emitted_at >= cutoff);
        Ok((before - dedupe.len()) as u64)
    }

    async fn mark_emitted(&self, message_id: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.dedupe.lock().insert(message_id.to_string(), at);
        Ok(())
    }
}

#[async_trait]
impl ContextRepository for FakeStore {
    async fn upsert(
        &self,
        owner_module: &str,
        source_key: &str,
        summary_short: &str,
        summary_long: &str,
        key_points: &[String],
        embedding: Option<&[f32]>,
        now: DateTime<Utc>,
    ) -> Result<ContextUpsertResult, StorageError> {
        let mut contexts = self.contexts.lock();
        let key = (owner_module.to_string(), source_key.to_string());
        let created = !contexts.contains_key(&key);
        let row = contexts
            .entry(key)
            .and_modify(|row| {
                row.summary_short = summary_short.to_string();
                row.summary_long = summary_long.to_string();
                row.key_points = key_points.to_vec();
                row.embedding = embedding.map(|e| e.to_vec());
                row.version += 1;
                row.updated_at = now;
            })
            .or_insert_with(|| ContextRow {
                id: uuid::Uuid::new_v4().to_string(),
                owner_module: owner_module.to_string(),
                source_key: source_key.to_string(),
                summary_short: summary_short.to_string(),
                summary_long: summary_long.to_string(),
                key_points: key_points.to_vec(),
                embedding: embedding.map(|e| e.to_vec()),
                version: 1,
                created_at: now,
                updated_at: now,
            })
            .clone();
        Ok(ContextUpsertResult { row, created })
    }

    async fn insert_link(
        &self,
        context_id: &str,
        message_id: &str,
        _now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut links = self.links.lock();
        let pair = (context_id.to_string(), message_id.to_string());
        if !links.contains(&pair) {
            links.push(pair);
        }
        Ok(())
    }

    async fn get(
        &self,
        owner_module: &str,
        source_key: &str,
    ) -> Result<Option<ContextRow>, StorageError> {
        Ok(self
            .contexts
            .lock()
            .get(&(owner_module.to_string(), source_key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
#[path = "../fake_tests.rs"]
mod tests;
