// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minute-resolution cron expression subset (spec §4.1 "Cron engine (C1)").

use chrono::{DateTime, Timelike, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported cron expression: {0}")]
pub struct CronParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinuteField {
    /// `*` — fire each minute at :00.
    Every,
    /// `*/N` — fire when `minute mod N == 0`.
    EveryN(u32),
    /// Literal 0-59 — fire once per hour at that minute.
    At(u32),
}

/// A parsed five-field cron expression. Only the minute field varies; the
/// other four positions must be literally `*` (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronSchedule {
    minute: MinuteField,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self, CronParseError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError(expr.to_string()));
        }
        if fields[1..].iter().any(|f| *f != "*") {
            return Err(CronParseError(expr.to_string()));
        }
        let minute = parse_minute_field(fields[0]).ok_or_else(|| CronParseError(expr.to_string()))?;
        Ok(Self { minute })
    }

    /// Smallest time strictly greater than `now`, truncated to seconds,
    /// satisfying the expression (spec §4.1 "Semantics").
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut candidate = truncate_to_minute(now) + chrono::Duration::minutes(1);
        loop {
            if self.fires_at(candidate) {
                return candidate;
            }
            candidate += chrono::Duration::minutes(1);
        }
    }

    fn fires_at(&self, at: DateTime<Utc>) -> bool {
        match self.minute {
            MinuteField::Every => true,
            MinuteField::EveryN(n) => at.minute() % n == 0,
            MinuteField::At(m) => at.minute() == m,
        }
    }
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(at)
}

fn parse_minute_field(field: &str) -> Option<MinuteField> {
    if field == "*" {
        return Some(MinuteField::Every);
    }
    if let Some(n) = field.strip_prefix("*/") {
        let n: u32 = n.parse().ok()?;
        if n == 0 {
            return None;
        }
        return Some(MinuteField::EveryN(n));
    }
    let m: u32 = field.parse().ok()?;
    if m <= 59 {
        Some(MinuteField::At(m))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
