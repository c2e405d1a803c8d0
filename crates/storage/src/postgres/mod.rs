// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Postgres-backed implementation of every repository trait, sharing one
//! `sqlx::Pool<Postgres>` across the whole process (spec §5 "DB pool:
//! shared by C4/C5/C6/C7/C8 and by handlers via ctx.db. No serialization;
//! correctness relies on row-level locks and unique constraints").

pub mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedeater_core::JobRunId;
use pgvector::Vector;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::repo::{
    ContextRepository, ContextUpsertResult, DedupeRepository, JobRunRepository,
    JobStateRepository, MessageRepository,
};
use crate::rows::{ArchivedMessageRow, ContextRow, JobRunRow, JobRunStatus, JobStateRow};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_tables(&self) {
        schema::ensure_tables(&self.pool).await;
    }

    pub async fn ensure_context_schema(&self, dim: u32) {
        schema::ensure_context_schema(&self.pool, dim).await;
    }
}

fn status_from_str(s: &str) -> JobRunStatus {
    match s {
        "success" => JobRunStatus::Success,
        "error" => JobRunStatus::Error,
        _ => JobRunStatus::Running,
    }
}

#[async_trait]
impl JobRunRepository for PgStore {
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
        sqlx::query(
            r#"INSERT INTO job_runs
                 (id, module, queue, job, status, trigger_type, trigger_json, started_at, created_at, updated_at)
               VALUES ($1, $2, $3, $4, 'running', $5, $6, $7, $7, $7)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(run_id.as_str())
        .bind(module)
        .bind(queue)
        .bind(job)
        .bind(trigger_type)
        .bind(trigger_json)
        .bind(started_at)
        .execute(&self.pool)
        .await?;
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
        sqlx::query(
            r#"UPDATE job_runs
               SET status = $2, finished_at = $3, error = $4, metrics_json = $5, updated_at = $3
               WHERE id = $1 AND status = 'running'"#,
        )
        .bind(run_id.as_str())
        .bind(status.as_str())
        .bind(finished_at)
        .bind(error)
        .bind(metrics_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-support"))]
    async fn get(&self, run_id: &JobRunId) -> Result<Option<JobRunRow>, StorageError> {
        let row = sqlx::query("SELECT * FROM job_runs WHERE id = $1")
            .bind(run_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        Ok(Some(JobRunRow {
            id: JobRunId::from_string(row.try_get::<String, _>("id")?),
            module: row.try_get("module")?,
            queue: row.try_get("queue")?,
            job: row.try_get("job")?,
            status: status_from_str(&row.try_get::<String, _>("status")?),
            trigger_type: row.try_get("trigger_type")?,
            trigger_json: row.try_get("trigger_json")?,
            started_at: row.try_get("started_at")?,
            finished_at: row.try_get("finished_at")?,
            error: row.try_get("error")?,
            metrics_json: row.try_get("metrics_json")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

#[async_trait]
impl JobStateRepository for PgStore {
    async fn touch_running(&self, module: &str, job: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO job_states (module, job, last_run_at)
               VALUES ($1, $2, $3)
               ON CONFLICT (module, job) DO UPDATE SET last_run_at = $3"#,
        )
        .bind(module)
        .bind(job)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_success(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        metrics_json: Option<Value>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO job_states (module, job, last_run_at, last_success_at, last_error, last_error_at, last_metrics)
               VALUES ($1, $2, $3, $3, NULL, NULL, $4)
               ON CONFLICT (module, job) DO UPDATE SET
                 last_run_at = $3, last_success_at = $3,
                 last_error = NULL, last_error_at = NULL, last_metrics = $4"#,
        )
        .bind(module)
        .bind(job)
        .bind(at)
        .bind(metrics_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_error(
        &self,
        module: &str,
        job: &str,
        at: DateTime<Utc>,
        error: String,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO job_states (module, job, last_run_at, last_error_at, last_error)
               VALUES ($1, $2, $3, $3, $4)
               ON CONFLICT (module, job) DO UPDATE SET
                 last_run_at = $3, last_error_at = $3, last_error = $4"#,
        )
        .bind(module)
        .bind(job)
        .bind(at)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-support"))]
    async fn get(&self, module: &str, job: &str) -> Result<Option<JobStateRow>, StorageError> {
        let row = sqlx::query("SELECT * FROM job_states WHERE module = $1 AND job = $2")
            .bind(module)
            .bind(job)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        Ok(Some(JobStateRow {
            module: row.try_get("module")?,
            job: row.try_get("job")?,
            last_run_at: row.try_get("last_run_at")?,
            last_success_at: row.try_get("last_success_at")?,
            last_error_at: row.try_get("last_error_at")?,
            last_error: row.try_get("last_error")?,
            last_metrics: row.try_get("last_metrics")?,
        }))
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn insert_if_absent(&self, row: ArchivedMessageRow) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"INSERT INTO bus_messages (id, source_module, source_stream, created_at, raw_json, tags_json, msg_from, message)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(&row.id)
        .bind(&row.source_module)
        .bind(&row.source_stream)
        .bind(row.created_at)
        .bind(&row.raw_json)
        .bind(&row.tags_json)
        .bind(&row.from)
        .bind(&row.message)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_replay_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ArchivedMessageRow>, StorageError> {
        let rows = sqlx::query(
            r#"SELECT m.* FROM bus_messages m
               LEFT JOIN bus_reemit_dedupe d ON d.message_id = m.id
               WHERE m.created_at >= $1 AND d.message_id IS NULL
               ORDER BY m.created_at ASC"#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ArchivedMessageRow {
                    id: row.try_get("id")?,
                    source_module: row.try_get("source_module")?,
                    source_stream: row.try_get("source_stream")?,
                    created_at: row.try_get("created_at")?,
                    raw_json: row.try_get("raw_json")?,
                    tags_json: row.try_get("tags_json")?,
                    from: row.try_get("msg_from")?,
                    message: row.try_get("message")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl DedupeRepository for PgStore {
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM bus_reemit_dedupe WHERE last_emitted_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn mark_emitted(&self, message_id: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO bus_reemit_dedupe (message_id, last_emitted_at) VALUES ($1, $2)
               ON CONFLICT (message_id) DO UPDATE SET last_emitted_at = $2"#,
        )
        .bind(message_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ContextRepository for PgStore {
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
        let id = uuid::Uuid::new_v4().to_string();
        let key_points_json = serde_json::to_value(key_points).unwrap_or(Value::Array(vec![]));
        let embedding_vec = embedding.map(|e| Vector::from(e.to_vec()));

        let row = sqlx::query(
            r#"INSERT INTO bus_contexts
                 (id, owner_module, source_key, summary_short, summary_long, key_points, embedding, version, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, 1, $8, $8)
               ON CONFLICT (owner_module, source_key) DO UPDATE SET
                 summary_short = $4, summary_long = $5, key_points = $6, embedding = $7,
                 version = bus_contexts.version + 1, updated_at = $8
               RETURNING id, owner_module, source_key, summary_short, summary_long,
                         key_points, embedding, version, created_at, updated_at"#,
        )
        .bind(&id)
        .bind(owner_module)
        .bind(source_key)
        .bind(summary_short)
        .bind(summary_long)
        .bind(&key_points_json)
        .bind(&embedding_vec)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let version: i64 = row.try_get("version")?;
        let key_points_stored: Value = row.try_get("key_points")?;
        let key_points_stored: Vec<String> =
            serde_json::from_value(key_points_stored).unwrap_or_default();
        let embedding_stored: Option<Vector> = row.try_get("embedding")?;

        Ok(ContextUpsertResult {
            created: version == 1,
            row: ContextRow {
                id: row.try_get("id")?,
                owner_module: row.try_get("owner_module")?,
                source_key: row.try_get("source_key")?,
                summary_short: row.try_get("summary_short")?,
                summary_long: row.try_get("summary_long")?,
                key_points: key_points_stored,
                embedding: embedding_stored.map(|v| v.to_vec()),
                version,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            },
        })
    }

    async fn insert_link(
        &self,
        context_id: &str,
        message_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO bus_context_messages (context_id, message_id, created_at)
               VALUES ($1, $2, $3)
               ON CONFLICT (context_id, message_id) DO NOTHING"#,
        )
        .bind(context_id)
        .bind(message_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-support"))]
    async fn get(
        &self,
        owner_module: &str,
        source_key: &str,
    ) -> Result<Option<ContextRow>, StorageError> {
        let row = sqlx::query("SELECT * FROM bus_contexts WHERE owner_module = $1 AND source_key = $2")
            .bind(owner_module)
            .bind(source_key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else { return Ok(None) };
        let key_points: Value = row.try_get("key_points")?;
        let key_points: Vec<String> = serde_json::from_value(key_points).unwrap_or_default();
        let embedding: Option<Vector> = row.try_get("embedding")?;
        Ok(Some(ContextRow {
            id: row.try_get("id")?,
            owner_module: row.try_get("owner_module")?,
            source_key: row.try_get("source_key")?,
            summary_short: row.try_get("summary_short")?,
            summary_long: row.try_get("summary_long")?,
            key_points,
            embedding: embedding.map(|v| v.to_vec()),
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}
