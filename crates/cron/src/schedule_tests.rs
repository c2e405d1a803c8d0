// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[test]
fn rejects_wrong_field_count() {
    assert!(CronSchedule::parse("* * *").is_err());
}

#[test]
fn rejects_non_wildcard_hour_field() {
    assert!(CronSchedule::parse("*/5 1 * * *").is_err());
}

#[test]
fn rejects_minute_out_of_range() {
    assert!(CronSchedule::parse("60 * * * *").is_err());
}

#[test]
fn rejects_every_n_zero() {
    assert!(CronSchedule::parse("*/0 * * * *").is_err());
}

#[test]
fn every_minute_fires_at_next_minute_boundary() {
    let schedule = CronSchedule::parse("* * * * *").unwrap();
    let now = at(2026, 1, 1, 12, 0, 30);
    assert_eq!(schedule.next_after(now), at(2026, 1, 1, 12, 1, 0));
}

#[test]
fn every_n_fires_on_multiples() {
    // S1 scenario: */15, at 12:00:00Z fires at 12:15:00Z.
    let schedule = CronSchedule::parse("*/15 * * * *").unwrap();
    let now = at(2026, 1, 1, 12, 0, 0);
    assert_eq!(schedule.next_after(now), at(2026, 1, 1, 12, 15, 0));
}

#[test]
fn every_5_minutes_always_lands_on_multiple_of_5_at_second_zero() {
    // Invariant 6.
    let schedule = CronSchedule::parse("*/5 * * * *").unwrap();
    let mut now = at(2026, 1, 1, 0, 0, 0);
    for _ in 0..20 {
        let fire = schedule.next_after(now);
        assert_eq!(fire.second(), 0);
        assert_eq!(fire.minute() % 5, 0);
        now = fire;
    }
}

#[test]
fn literal_minute_fires_once_per_hour() {
    let schedule = CronSchedule::parse("30 * * * *").unwrap();
    let now = at(2026, 1, 1, 12, 30, 0);
    assert_eq!(schedule.next_after(now), at(2026, 1, 1, 13, 30, 0));
}

#[test]
fn next_after_is_strictly_greater_than_now() {
    let schedule = CronSchedule::parse("* * * * *").unwrap();
    let now = at(2026, 1, 1, 12, 0, 0);
    assert!(schedule.next_after(now) > now);
}
