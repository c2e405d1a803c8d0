// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use feedeater_core::FakeClock;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn unsupported_expression_reports_exactly_one_error_and_no_ticks() {
    let clock = FakeClock::default();
    let ticks = Arc::new(AtomicUsize::new(0));
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let ticks_inner = ticks.clone();
    let errors_inner = errors.clone();
    let handle = CronEngine::schedule(
        clock.clone(),
        "* * 1 * *",
        move |_at: DateTime<Utc>| {
            let ticks_inner = ticks_inner.clone();
            async move {
                ticks_inner.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
        move |message: &str| errors_inner.lock().push(message.to_string()),
    );

    clock.advance(Duration::from_secs(120));
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
    assert_eq!(errors.lock().len(), 1);
    handle.cancel();
}

#[tokio::test]
async fn supported_expression_ticks_and_cancel_stops_further_ticks() {
    let clock = FakeClock::default();
    let ticks = Arc::new(AtomicUsize::new(0));

    let ticks_inner = ticks.clone();
    let handle = CronEngine::schedule(
        clock.clone(),
        "* * * * *",
        move |_at: DateTime<Utc>| {
            let ticks_inner = ticks_inner.clone();
            async move {
                ticks_inner.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
        |_message: &str| {},
    );

    for _ in 0..3 {
        clock.advance(Duration::from_secs(60));
        settle().await;
    }
    assert!(ticks.load(Ordering::SeqCst) >= 2);

    handle.cancel();
    handle.cancel(); // idempotent
    let seen_before = ticks.load(Ordering::SeqCst);
    clock.advance(Duration::from_secs(300));
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen_before);
}
