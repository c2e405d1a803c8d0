// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job dispatcher (spec §4.7 "Job dispatcher (C7)"): the sole executor of
//! canonical job-run events published on `feedeater.jobs.>`. Every event is
//! handled on its own spawned task so handlers never serialize through a
//! single worker (spec §5 "no global mutex around handler execution").

use std::path::PathBuf;
use std::sync::Arc;

use feedeater_bus::{Bus, SettingsClient};
use feedeater_core::Clock;
use feedeater_modules::{JobContext, JobInvocation, Registry};
use feedeater_storage::{JobRunRepository, JobRunStatus, JobStateRepository};
use feedeater_wire::{job_run_subject, JobRunEvent, Trigger, JOBS_WILDCARD};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Subscribe to the job-run wildcard and dispatch every decodable event
/// until `cancel` fires or the bus subscription closes.
#[allow(clippy::too_many_arguments)]
pub async fn run<B, S, C>(
    bus: Arc<B>,
    store: Arc<S>,
    registry: Arc<Registry>,
    settings: Arc<dyn SettingsClient>,
    modules_dir: PathBuf,
    database_url: Arc<str>,
    bus_url: Arc<str>,
    clock: C,
    cancel: CancellationToken,
) where
    B: Bus + 'static,
    S: JobRunRepository + JobStateRepository + 'static,
    C: Clock,
{
    let mut subscription = match bus.subscribe(JOBS_WILDCARD).await {
        Ok(subscription) => subscription,
        Err(err) => {
            error!(error = %err, "dispatcher failed to subscribe, loop will not run");
            return;
        }
    };

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = subscription.next() => message,
        };
        let Some(message) = message else { break };

        let mut event: JobRunEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(err) => {
                error!(subject = %message.subject, error = %err, "dropping undecodable job-run event");
                continue;
            }
        };
        event.run_id_or_assign();

        let bus = bus.clone();
        let store = store.clone();
        let registry = registry.clone();
        let settings = settings.clone();
        let modules_dir = modules_dir.clone();
        let database_url = database_url.clone();
        let bus_url = bus_url.clone();
        let clock = clock.clone();
        tokio::spawn(async move {
            execute(&*bus, &*store, &registry, &*settings, &modules_dir, &database_url, &bus_url, &clock, event).await;
        });
    }
}

#[allow(clippy::too_many_arguments)]
async fn execute<B, S, C>(
    bus: &B,
    store: &S,
    registry: &Registry,
    settings: &dyn SettingsClient,
    modules_dir: &PathBuf,
    database_url: &str,
    bus_url: &str,
    clock: &C,
    mut event: JobRunEvent,
) where
    B: Bus,
    S: JobRunRepository + JobStateRepository,
    C: Clock,
{
    let run_id = event.run_id_or_assign();
    let started_at = clock.now_utc();
    let trigger_json = serde_json::to_value(&event.trigger).unwrap_or(Value::Null);

    if let Err(err) = store
        .start_running(
            &run_id,
            &event.module,
            &event.queue,
            &event.job,
            trigger_type_str(&event.trigger),
            trigger_json,
            started_at,
        )
        .await
    {
        error!(run_id = %run_id, error = %err, "failed to record job-run start, continuing");
    }
    if let Err(err) = store.touch_running(&event.module, &event.job, started_at).await {
        error!(run_id = %run_id, error = %err, "failed to touch job state on start, continuing");
    }

    let Some(handler) = registry.handler(&event.module, &event.queue, &event.job) else {
        let message = format!("no handler registered for {}/{}/{}", event.module, event.queue, event.job);
        finalize_error(store, &run_id, &event.module, &event.job, clock.now_utc(), message).await;
        return;
    };

    let module_settings = settings.fetch_settings(&event.module).await;
    let ctx = JobContext {
        module_name: event.module.clone(),
        modules_dir: modules_dir.clone(),
        settings: module_settings,
        db_dsn: scoped_db_dsn(database_url, &event.module),
        bus_url: bus_url.to_string(),
    };
    let invocation = JobInvocation {
        name: event.job.clone(),
        queue: event.queue.clone(),
        id: run_id.clone(),
        data: event.data.take(),
    };

    let start = clock.now();
    let outcome = handler.invoke(&ctx, invocation).await;
    let duration_ms = clock.now().saturating_duration_since(start).as_millis() as i64;
    let finished_at = clock.now_utc();

    match outcome {
        Ok(outcome) => {
            let metrics_json = merge_metrics(outcome.metrics, duration_ms);
            if let Err(err) = store
                .finalize(&run_id, JobRunStatus::Success, finished_at, None, Some(metrics_json.clone()))
                .await
            {
                error!(run_id = %run_id, error = %err, "failed to finalize successful job-run, continuing");
            }
            if let Err(err) = store.record_success(&event.module, &event.job, finished_at, Some(metrics_json)).await {
                error!(run_id = %run_id, error = %err, "failed to update job state on success, continuing");
            }

            for enqueue in outcome.enqueue {
                let internal = JobRunEvent::new(&event.module, &event.queue, &enqueue.job_name, clock.now_utc(), Trigger::internal());
                let internal = match enqueue.data {
                    Some(data) => internal.with_data(data),
                    None => internal,
                };
                let subject = job_run_subject(&event.module, &event.queue, &enqueue.job_name);
                if let Ok(payload) = serde_json::to_vec(&internal) {
                    if let Err(err) = bus.publish(&subject, payload).await {
                        warn!(subject, error = %err, "failed to publish internally enqueued job-run event");
                    }
                }
            }
        }
        Err(message) => finalize_error(store, &run_id, &event.module, &event.job, finished_at, message).await,
    }
}

async fn finalize_error<S: JobRunRepository + JobStateRepository>(
    store: &S,
    run_id: &feedeater_core::JobRunId,
    module: &str,
    job: &str,
    at: chrono::DateTime<chrono::Utc>,
    message: String,
) {
    if let Err(err) = store.finalize(run_id, JobRunStatus::Error, at, Some(message.clone()), None).await {
        error!(run_id = %run_id, error = %err, "failed to finalize errored job-run, continuing");
    }
    if let Err(err) = store.record_error(module, job, at, message).await {
        error!(run_id = %run_id, error = %err, "failed to update job state on error, continuing");
    }
}

/// Scope `database_url` to a module's own `mod_<name>` schema (spec §3
/// "granted ... read/write capability to its own `mod_<name>.*` schema")
/// by setting the session `search_path` via the connection's `options`
/// parameter, so the module runtime opens its own pool already confined
/// to its schema.
fn scoped_db_dsn(database_url: &str, module: &str) -> String {
    let options = format!("-csearch_path%3Dmod_{module}");
    let separator = if database_url.contains('?') { '&' } else { '?' };
    format!("{database_url}{separator}options={options}")
}

fn trigger_type_str(trigger: &Trigger) -> &'static str {
    match trigger.kind {
        feedeater_wire::TriggerType::Schedule => "schedule",
        feedeater_wire::TriggerType::Manual => "manual",
        feedeater_wire::TriggerType::Event => "event",
    }
}

fn merge_metrics(metrics: Option<Value>, duration_ms: i64) -> Value {
    match metrics {
        Some(Value::Object(mut map)) => {
            map.insert("durationMs".to_string(), Value::from(duration_ms));
            Value::Object(map)
        }
        Some(other) => serde_json::json!({"durationMs": duration_ms, "result": other}),
        None => serde_json::json!({"durationMs": duration_ms}),
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
