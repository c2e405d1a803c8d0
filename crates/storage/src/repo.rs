// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository traits. One production implementation
//! ([`crate::postgres::PgStore`]) backs all of them against a single
//! `sqlx::Pool<Postgres>`; a fake in-memory implementation
//! ([`crate::fake::FakeStore`], behind `test-support`) backs the dispatcher,
//! archiver, upserter, and replayer unit tests without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedeater_core::JobRunId;
use serde_json::Value;

use crate::error::StorageError;
use crate::rows::{ArchivedMessageRow, ContextRow, JobStateRow, JobRunRow, JobRunStatus};

#[async_trait]
pub trait JobRunRepository: Send + Sync {
    /// Insert the `running` row for a run, keyed by `run_id` (spec §4.7 step 2).
    /// A second call with the same `run_id` is a no-op.
    async fn start_running(
        &self,
        run_id: &JobRunId,
        module: &str,
        queue: &str,
        job: &str,
        trigger_type: &str,
        trigger_json: Value,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Transition a run from `running` to a terminal status. Guarded so the
    /// transition applies at most once per `run_id` (spec §5 "at most one
    /// terminal state transition").
    async fn finalize(
        &self,
        run_id: &JobRunId,
        status: JobRunStatus,
        finished_at: DateTime<Utc>,
        error: Option<String>,
        metrics_json: Option<Value>,
    ) -> Result<(), StorageError>;

    #[cfg(any(test, feature = "test-support"))]
    async fn get(&self, run_id: &JobRunId) -> Result<Option<JobRunRow>, StorageError>;
}

#[async_trait]
pub trait JobStateRepository: Send + Sync {
    /// Touch `last_run_at` for `(module, job)` when dispatch begins (spec
    /// §4.7 step 2 "Start record: ... touch job_states.lastRunAt"), ahead of
    /// whatever terminal state `record_success`/`record_error` lands later.
    async fn touch_running(&self, module: &str, job: &str, at: DateTime<Utc>) -> Result<(), StorageError>;

    async fn record_success(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        metrics_json: Option<Value>,
    ) -> Result<(), StorageError>;

    async fn record_error(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        error: String,
    ) -> Result<(), StorageError>;

    #[cfg(any(test, feature = "test-support"))]
    async fn get(&self, module: &str, job: &str) -> Result<Option<JobStateRow>, StorageError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// `INSERT ... ON CONFLICT (id) DO NOTHING` (spec §4.5). Returns whether
    /// the row was newly inserted.
    async fn insert_if_absent(&self, row: ArchivedMessageRow) -> Result<bool, StorageError>;

    /// Archived messages with `createdAt >= cutoff` that have no dedupe row,
    /// ordered by `createdAt` ascending (spec §4.8 step 2).
    async fn select_replay_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ArchivedMessageRow>, StorageError>;
}

#[async_trait]
pub trait DedupeRepository: Send + Sync {
    /// Purge rows with `lastEmittedAt < cutoff` (spec §4.8 step 1).
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;

    /// `(messageId, lastEmittedAt=now) ON CONFLICT (messageId) DO UPDATE`.
    async fn mark_emitted(&self, message_id: &str, at: DateTime<Utc>) -> Result<(), StorageError>;
}

/// Result of a context upsert: the resulting row and whether this call
/// created it (`version == 1`) or updated an existing one.
pub struct ContextUpsertResult {
    pub row: ContextRow,
    pub created: bool,
}

#[async_trait]
pub trait ContextRepository: Send + Sync {
    /// Upsert on `(ownerModule, sourceKey)` (spec §3 "Context row", §4.6 rule 4).
    #[allow(clippy::too_many_arguments)]
    async fn upsert(
        &self,
        owner_module: &str,
        source_key: &str,
        summary_short: &str,
        summary_long: &str,
        key_points: &[String],
        embedding: Option<&[f32]>,
        now: DateTime<Utc>,
    ) -> Result<ContextUpsertResult, StorageError>;

    /// `(contextId, messageId) ON CONFLICT DO NOTHING` (spec §4.6 rule 5).
    async fn insert_link(
        &self,
        context_id: &str,
        message_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    #[cfg(any(test, feature = "test-support"))]
    async fn get(
        &self,
        owner_module: &str,
        source_key: &str,
    ) -> Result<Option<ContextRow>, StorageError>;
}
