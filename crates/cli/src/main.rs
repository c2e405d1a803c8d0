// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process entrypoint. Resolves configuration from the environment,
//! boots the daemon, then waits for SIGINT/SIGTERM before asking every
//! subscription loop and cron schedule to stop (spec §5, §6, §7).

mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use feedeater_daemon::BusLogLayer;
use feedeater_wire::WorkerLogEvent;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Grace period between asking background loops to stop and exiting the
/// process. Loops only publish/write inside a single await point at a time,
/// so this is generous rather than tuned against a measured worst case.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn build_git_hash() -> &'static str {
    env!("BUILD_GIT_HASH")
}

/// Collects config parsing and daemon startup behind one `anyhow::Result`
/// so `main` has a single error path to log and exit on.
async fn boot(
    log_rx: tokio::sync::mpsc::UnboundedReceiver<WorkerLogEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let config = config::from_env().map_err(|err| {
        error!(kind = %err.kind(), error = %err, "invalid configuration");
        err
    })?;
    feedeater_daemon::run(config, Some(log_rx), cancel)
        .await
        .map_err(|err| {
            error!(kind = %err.kind(), error = %err, "failed to boot worker");
            err
        })
        .context("daemon boot failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let (log_layer, log_rx) = BusLogLayer::new();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .with(log_layer)
        .init();

    info!(git_hash = build_git_hash(), "starting feedeater worker");

    let cancel = CancellationToken::new();

    if boot(log_rx, cancel.clone()).await.is_err() {
        return ExitCode::FAILURE;
    }

    info!("worker booted, waiting for shutdown signal");
    wait_for_shutdown_signal().await;

    info!("shutdown signal received, stopping subscription loops");
    cancel.cancel();
    tokio::time::sleep(SHUTDOWN_GRACE).await;

    ExitCode::SUCCESS
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            error!(error = %err, "failed to install SIGTERM handler, falling back to ctrl-c only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigterm.recv() => {},
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
