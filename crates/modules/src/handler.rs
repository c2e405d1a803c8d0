// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job execution context and the `Handler` seam invoked by the
//! dispatcher (spec §4.3 "Per-job context provided to handlers").

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use feedeater_core::JobRunId;
use serde_json::Value;

/// Context handed to a module's handler for a single job-run (spec §3
/// "granted ... read/write capability to its own `mod_<name>.*` schema",
/// spec §4.3 "db — connection pool handle, bus — publish capability").
/// `db_dsn` is the worker's database URL with its session `search_path`
/// scoped to `mod_<module_name>`, and `bus_url` is the bus URL the
/// dispatcher itself connects to; the module runtime opens its own
/// connections from these rather than the pool/client being serialized
/// across the subprocess boundary. Settings are pre-fetched by the
/// dispatcher and queue enqueues flow back through
/// [`HandlerOutcome::enqueue`].
#[derive(Debug, Clone)]
pub struct JobContext {
    pub module_name: String,
    pub modules_dir: PathBuf,
    pub settings: HashMap<String, Option<String>>,
    pub db_dsn: String,
    pub bus_url: String,
}

/// A single job invocation (spec §4.3 `Handler(ctx, {name, data, id})`).
#[derive(Debug, Clone)]
pub struct JobInvocation {
    pub name: String,
    pub queue: String,
    pub id: JobRunId,
    pub data: Option<Value>,
}

/// A request made by a handler to enqueue another in-process job, mirroring
/// `ctx.getQueue(name).add(jobName, data)` (spec §4.3).
#[derive(Debug, Clone)]
pub struct EnqueueRequest {
    pub job_name: String,
    pub data: Option<Value>,
}

/// What a handler invocation produced: optional metrics to persist on the
/// `job_runs` row, plus any queue enqueues it requested.
#[derive(Debug, Clone, Default)]
pub struct HandlerOutcome {
    pub metrics: Option<Value>,
    pub enqueue: Vec<EnqueueRequest>,
}

/// A module's handler for a `(queue, job)` pair. One implementation,
/// `feedeater-exec::ProcessHandler`, forwards invocations to the module's
/// `runtime.entry` subprocess; tests use an in-memory fake.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn invoke(&self, ctx: &JobContext, invocation: JobInvocation) -> Result<HandlerOutcome, String>;
}
