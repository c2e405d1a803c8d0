// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron engine for the feed-aggregation worker (spec §4.1 "Cron engine (C1)").

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod engine;
mod error;
mod schedule;

pub use engine::{CronEngine, CronHandle, OnError, OnTick};
pub use error::CronParseError;
pub use schedule::CronSchedule;
