// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured log event mirrored onto `feedeater.worker.log` (spec §6, §7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerLogEvent {
    pub level: LogLevel,
    /// Always `"worker"` — the worker process is the sole publisher of this subject.
    pub module: String,
    /// Always `"process"` for now; reserved for future per-subsystem tagging.
    pub source: String,
    pub at: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl WorkerLogEvent {
    pub fn new(level: LogLevel, at: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            level,
            module: "worker".to_string(),
            source: "process".to_string(),
            at,
            message: message.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
