// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// A clock that provides the current time. Every component that needs "now"
/// for scheduling, lifecycle timestamps, or backoff sleeps takes a `C: Clock`
/// so tests can drive time deterministically instead of sleeping for real.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant, used for measuring durations (e.g. handler wall time).
    fn now(&self) -> Instant;
    /// Wall-clock time, used for persisted timestamps and cron scheduling.
    fn now_utc(&self) -> DateTime<Utc>;
    /// Suspend the caller until `deadline`. Implementations may return
    /// immediately once `deadline` has already passed.
    fn sleep_until(&self, deadline: DateTime<Utc>) -> impl std::future::Future<Output = ()> + Send;
}

/// Real system clock, backed by `tokio::time::sleep`.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        let now = Utc::now();
        if deadline <= now {
            return;
        }
        let remaining = (deadline - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        tokio::time::sleep(remaining).await;
    }
}

/// Fake clock for testing with controllable, manually-advanced time.
#[derive(Clone)]
pub struct FakeClock {
    instant: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(DateTime::UNIX_EPOCH)),
        }
    }

    pub fn at(utc: DateTime<Utc>) -> Self {
        let clock = Self::new();
        clock.set_utc(utc);
        clock
    }

    /// Advance the clock by the given duration. Any in-flight `sleep_until`
    /// whose deadline has now passed resolves on its next poll.
    pub fn advance(&self, duration: Duration) {
        *self.instant.lock() += duration;
        *self.utc.lock() += chrono::Duration::from_std(duration).unwrap_or_default();
    }

    pub fn set_utc(&self, utc: DateTime<Utc>) {
        *self.utc.lock() = utc;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.instant.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc.lock()
    }

    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        // Tests advance the clock explicitly rather than relying on real
        // wall-clock sleeps; poll until the fake clock catches up.
        while self.now_utc() < deadline {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
