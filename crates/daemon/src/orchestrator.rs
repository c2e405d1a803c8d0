// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator (spec §4.9 "Orchestrator"): wires C1–C8 together in the
//! documented boot order. Fatal failures up to and including opening the
//! DB pool abort startup; everything after that runs as an independent,
//! cancelable subscription loop (spec §5 "Cancellation & shutdown").

use std::path::PathBuf;
use std::sync::Arc;

use feedeater_bus::{Bus, HttpSettingsClient, NatsBus, SettingsClient};
use feedeater_core::{Clock, SystemClock};
use feedeater_cron::{CronEngine, CronHandle};
use feedeater_exec::ProcessHandler;
use feedeater_modules::{Handler, Registry};
use feedeater_storage::postgres::PgStore;
use feedeater_wire::{decode_message_created, job_run_subject, JobRunEvent, Trigger, WorkerLogEvent};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::BootError;
use crate::{archiver, dispatcher, log_bridge, replayer, upserter};

const DEFAULT_EMBED_DIM: u32 = 4096;
const DEFAULT_LOOKBACK_MINUTES: i64 = 60;

/// Boot the worker and run until `cancel` fires. Returns once every
/// subscription loop and cron schedule has been asked to stop. `log_rx` is
/// the receiving half of a [`crate::BusLogLayer`] registered on the global
/// subscriber before this is called; `None` disables worker-log mirroring
/// (e.g. in tests that never install the layer).
pub async fn run(
    config: Config,
    log_rx: Option<UnboundedReceiver<WorkerLogEvent>>,
    cancel: CancellationToken,
) -> Result<(), BootError> {
    let clock = SystemClock;

    let bus = Arc::new(NatsBus::connect(&config.nats_url).await?);
    info!(nats_url = %config.nats_url, "connected to bus");

    if let Some(log_rx) = log_rx {
        tokio::spawn(log_bridge::run(bus.clone(), log_rx, cancel.clone()));
    }

    let store = Arc::new(PgStore::connect(&config.database_url).await?);
    info!("opened database pool");

    let settings: Arc<dyn SettingsClient> = Arc::new(HttpSettingsClient::new(
        config.api_base_url.clone(),
        config.internal_token.clone(),
        clock.clone(),
    ));
    let system_settings = settings.fetch_settings("system").await;
    let embed_dim = system_settings
        .get("ollama_embed_dim")
        .and_then(|v| v.as_deref())
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|d| *d > 0)
        .unwrap_or(if config.ollama_embed_dim > 0 { config.ollama_embed_dim } else { DEFAULT_EMBED_DIM });
    let lookback_minutes = system_settings
        .get("dashboard_bus_history_minutes")
        .and_then(|v| v.as_deref())
        .and_then(|s| s.parse::<i64>().ok())
        .map(|m| if m < 0 { DEFAULT_LOOKBACK_MINUTES } else { m })
        .unwrap_or(DEFAULT_LOOKBACK_MINUTES);

    store.ensure_tables().await;
    store.ensure_context_schema(embed_dim).await;

    tokio::spawn(archiver::run(bus.clone(), store.clone(), cancel.clone()));

    let registry = Arc::new(discover_modules(&config.modules_dir));
    for failed in registry.failed_modules() {
        warn!(module = %failed.name, path = %failed.path.display(), error = %failed.error, "module failed to load");
    }

    let database_url: Arc<str> = Arc::from(config.database_url.as_str());
    let bus_url: Arc<str> = Arc::from(config.nats_url.as_str());
    tokio::spawn(dispatcher::run(
        bus.clone(),
        store.clone(),
        registry.clone(),
        settings.clone(),
        config.modules_dir.clone(),
        database_url,
        bus_url,
        clock.clone(),
        cancel.clone(),
    ));

    let mut cron_handles = Vec::new();
    for (module, job) in registry.all_jobs() {
        if let Some(expr) = job.schedule.clone() {
            cron_handles.push(schedule_cron_job(bus.clone(), clock.clone(), module.clone(), job.queue.clone(), job.name.clone(), &expr));
        }
        if let Some(subject) = job.triggered_by.clone() {
            spawn_external_trigger(bus.clone(), clock.clone(), cancel.clone(), module.clone(), job.queue.clone(), job.name.clone(), subject);
        }
    }
    spawn_cron_shutdown(cancel.clone(), cron_handles);

    tokio::spawn(upserter::run(bus.clone(), store.clone(), embed_dim, cancel.clone()));

    replayer::run(&*bus, &*store, clock.now_utc(), lookback_minutes).await;

    Ok(())
}

/// Discover modules and load a [`ProcessHandler`] for each one declaring a
/// runtime entry. `Registry::discover`'s loader closure is synchronous
/// (spec §4.3 keeps handler resolution free of async in the lookup path),
/// so spawning the subprocess is bridged onto the current runtime.
fn discover_modules(modules_dir: &std::path::Path) -> Registry {
    Registry::discover(modules_dir, |manifest| {
        let entry = manifest
            .runtime
            .as_ref()
            .map(|r| r.entry.clone())
            .ok_or_else(|| "manifest declares no runtime entry".to_string())?;
        let working_dir: PathBuf = modules_dir.join(&manifest.name);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(ProcessHandler::spawn(&entry, &working_dir))
        })
        .map(|handler| Arc::new(handler) as Arc<dyn Handler>)
        .map_err(|err| err.to_string())
    })
}

fn schedule_cron_job<B: Bus + 'static, C: Clock>(
    bus: Arc<B>,
    clock: C,
    module: String,
    queue: String,
    job: String,
    expr: &str,
) -> CronHandle {
    let on_tick = move |_fired_at: chrono::DateTime<chrono::Utc>| {
        let bus = bus.clone();
        let module = module.clone();
        let queue = queue.clone();
        let job = job.clone();
        async move {
            let event = JobRunEvent::new(&module, &queue, &job, chrono::Utc::now(), Trigger::schedule());
            let subject = job_run_subject(&module, &queue, &job);
            let payload = serde_json::to_vec(&event).map_err(|e| e.to_string())?;
            bus.publish(&subject, payload).await.map_err(|e| e.to_string())
        }
    };
    let on_error = |message: &str| error!(error = message, "cron schedule reported an error");

    CronEngine::schedule(clock, expr, on_tick, on_error)
}

#[allow(clippy::too_many_arguments)]
fn spawn_external_trigger<B: Bus + 'static, C: Clock>(
    bus: Arc<B>,
    clock: C,
    cancel: CancellationToken,
    module: String,
    queue: String,
    job: String,
    subject: String,
) {
    tokio::spawn(async move {
        let mut subscription = match bus.subscribe(&subject).await {
            Ok(subscription) => subscription,
            Err(err) => {
                error!(subject = %subject, error = %err, "external-trigger subscription failed");
                return;
            }
        };

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => break,
                message = subscription.next() => message,
            };
            let Some(message) = message else { break };

            let decoded = match decode_message_created(&message.payload) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(subject = %subject, error = %err, "dropping undecodable external-trigger payload");
                    continue;
                }
            };

            let trigger = Trigger::event(subject.clone(), decoded.id.clone());
            let data = serde_json::json!({"trigger": {"subject": subject.clone(), "messageId": decoded.id}});
            let event = JobRunEvent::new(&module, &queue, &job, clock.now_utc(), trigger).with_data(data);
            let out_subject = job_run_subject(&module, &queue, &job);
            match serde_json::to_vec(&event) {
                Ok(payload) => {
                    if let Err(err) = bus.publish(&out_subject, payload).await {
                        warn!(subject = %out_subject, error = %err, "failed to publish externally-triggered job-run event");
                    }
                }
                Err(err) => error!(error = %err, "failed to encode externally-triggered job-run event"),
            }
        }
    });
}

fn spawn_cron_shutdown(cancel: CancellationToken, handles: Vec<CronHandle>) {
    tokio::spawn(async move {
        cancel.cancelled().await;
        for handle in handles {
            handle.cancel();
        }
    });
}
