// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron engine (spec §4.1 "Cron engine (C1)"): `schedule(expr, onTick,
//! onError) -> cancel()`. Unsupported expressions produce exactly one
//! `onError` call and no ticks; supported expressions tick forever until
//! cancelled.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use feedeater_core::Clock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::schedule::CronSchedule;

type TickFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Callback invoked at every scheduled fire time.
pub trait OnTick: Send + Sync + 'static {
    fn tick(&self, at: DateTime<Utc>) -> TickFuture;
}

impl<F, Fut> OnTick for F
where
    F: Fn(DateTime<Utc>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    fn tick(&self, at: DateTime<Utc>) -> TickFuture {
        Box::pin(self(at))
    }
}

/// Callback invoked on parse failure or on a tick's own reported error.
pub trait OnError: Send + Sync + 'static {
    fn error(&self, message: &str);
}

impl<F> OnError for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn error(&self, message: &str) {
        self(message)
    }
}

/// A handle to a running cron schedule. Cancelling is idempotent and drops
/// any pending tick (spec §4.1 "cancel()").
pub struct CronHandle {
    cancel: CancellationToken,
}

impl CronHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

pub struct CronEngine;

impl CronEngine {
    /// Parses `expr` and, if valid, spawns a task that sleeps until each
    /// fire time (via `clock.sleep_until`), invokes `on_tick`, and repeats.
    /// A tick that returns `Err` is routed to `on_error`; the schedule keeps
    /// running. An unparseable expression routes exactly once to `on_error`
    /// and no task is spawned.
    pub fn schedule<C>(
        clock: C,
        expr: &str,
        on_tick: impl OnTick,
        on_error: impl OnError,
    ) -> CronHandle
    where
        C: Clock + Clone + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();

        let schedule = match CronSchedule::parse(expr) {
            Ok(schedule) => schedule,
            Err(err) => {
                on_error.error(&err.to_string());
                return CronHandle { cancel };
            }
        };

        let on_tick = Arc::new(on_tick);
        let on_error = Arc::new(on_error);
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                let now = clock.now_utc();
                let next = schedule.next_after(now);

                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!("cron schedule cancelled");
                        return;
                    }
                    _ = clock.sleep_until(next) => {}
                }

                if task_cancel.is_cancelled() {
                    return;
                }

                if let Err(err) = on_tick.tick(next).await {
                    warn!(error = %err, "cron tick handler failed");
                    on_error.error(&err);
                }
            }
        });

        CronHandle { cancel }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
