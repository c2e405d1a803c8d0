// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent schema management (spec §4.4 "Context store manager", §6
//! "the worker owns migrations via idempotent CREATE IF NOT EXISTS /
//! ALTER ... IF EXISTS on boot; failures are warnings").

use sqlx::PgPool;
use tracing::warn;

/// Create every table the worker owns if it doesn't already exist. Called
/// once at boot, before any component subscribes or queries.
pub async fn ensure_tables(pool: &PgPool) {
    for statement in TABLE_STATEMENTS {
        if let Err(err) = sqlx::query(statement).execute(pool).await {
            warn!(error = %err, statement, "failed to ensure table, continuing");
        }
    }
}

const TABLE_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS bus_messages (
        id TEXT PRIMARY KEY,
        source_module TEXT NOT NULL,
        source_stream TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        raw_json JSONB NOT NULL,
        tags_json JSONB,
        msg_from TEXT,
        message TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bus_reemit_dedupe (
        message_id TEXT PRIMARY KEY,
        last_emitted_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bus_contexts (
        id TEXT PRIMARY KEY,
        owner_module TEXT NOT NULL,
        source_key TEXT NOT NULL,
        summary_short TEXT NOT NULL,
        summary_long TEXT NOT NULL,
        key_points JSONB NOT NULL DEFAULT '[]',
        version BIGINT NOT NULL DEFAULT 1,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        UNIQUE (owner_module, source_key)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bus_context_messages (
        context_id TEXT NOT NULL,
        message_id TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (context_id, message_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_runs (
        id TEXT PRIMARY KEY,
        module TEXT NOT NULL,
        queue TEXT NOT NULL,
        job TEXT NOT NULL,
        status TEXT NOT NULL,
        trigger_type TEXT NOT NULL,
        trigger_json JSONB NOT NULL,
        started_at TIMESTAMPTZ NOT NULL,
        finished_at TIMESTAMPTZ,
        error TEXT,
        metrics_json JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_states (
        module TEXT NOT NULL,
        job TEXT NOT NULL,
        last_run_at TIMESTAMPTZ,
        last_success_at TIMESTAMPTZ,
        last_error_at TIMESTAMPTZ,
        last_error TEXT,
        last_metrics JSONB,
        PRIMARY KEY (module, job)
    )"#,
];

/// Ensure the vector extension, the `bus_contexts.embedding` column type, and
/// the ANN cosine index match the configured dimension `dim` (spec §4.4).
/// Every statement is independently best-effort: a failure is logged at WARN
/// and does not halt startup.
pub async fn ensure_context_schema(pool: &PgPool, dim: u32) {
    if let Err(err) = sqlx::query("CREATE EXTENSION IF NOT EXISTS vector").execute(pool).await {
        warn!(error = %err, "failed to ensure pgvector extension, continuing");
        return;
    }

    match current_embedding_type(pool).await {
        Ok(Some(current)) if current == format!("vector({dim})") => {}
        Ok(Some(current)) => {
            // The column exists with a different dimension. Existing
            // embeddings can't be reinterpreted at a new dimension, so the
            // column is dropped and re-added rather than altered in place.
            warn!(current, dim, "embedding dimension changed, dropping and recreating column");
            if let Err(err) =
                sqlx::query("ALTER TABLE bus_contexts DROP COLUMN IF EXISTS embedding").execute(pool).await
            {
                warn!(error = %err, "failed to drop stale embedding column, continuing");
            }
            if let Err(err) = add_embedding_column(pool, dim).await {
                warn!(error = %err, "failed to recreate embedding column, continuing");
            }
        }
        Ok(None) => {
            if let Err(err) = add_embedding_column(pool, dim).await {
                warn!(error = %err, "failed to ensure embedding column, continuing");
            }
        }
        Err(err) => {
            warn!(error = %err, "failed to inspect embedding column type, continuing");
        }
    }

    if (1..=2000).contains(&dim) {
        let create_index = "CREATE INDEX IF NOT EXISTS bus_contexts_embedding_ann_idx \
             ON bus_contexts USING ivfflat (embedding vector_cosine_ops)";
        if let Err(err) = sqlx::query(create_index).execute(pool).await {
            warn!(error = %err, "failed to ensure ANN index, continuing");
        }
    } else {
        warn!(dim, "embedding dimension out of ANN-indexable range, dropping index if present");
        if let Err(err) =
            sqlx::query("DROP INDEX IF EXISTS bus_contexts_embedding_ann_idx").execute(pool).await
        {
            warn!(error = %err, "failed to drop ANN index, continuing");
        }
    }
}

/// `format_type` of `bus_contexts.embedding`, e.g. `"vector(768)"`, or
/// `None` if the column doesn't exist yet.
async fn current_embedding_type(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT format_type(a.atttypid, a.atttypmod)
           FROM pg_attribute a
           JOIN pg_class c ON c.oid = a.attrelid
           WHERE c.relname = 'bus_contexts' AND a.attname = 'embedding' AND NOT a.attisdropped"#,
    )
    .fetch_optional(pool)
    .await
}

async fn add_embedding_column(pool: &PgPool, dim: u32) -> Result<(), sqlx::Error> {
    let alter = format!("ALTER TABLE bus_contexts ADD COLUMN IF NOT EXISTS embedding vector({dim})");
    sqlx::query(&alter).execute(pool).await?;
    Ok(())
}
