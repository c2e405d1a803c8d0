// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What caused a job-run event to be published (spec §3 "Job-run event").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Schedule,
    Manual,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: TriggerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "messageId")]
    pub message_id: Option<String>,
}

impl Trigger {
    /// Cron fire (spec §4.7: "Cron ticks ... transformed ... with trigger={type:\"schedule\"}").
    pub fn schedule() -> Self {
        Self { kind: TriggerType::Schedule, subject: None, message_id: None }
    }

    /// `ctx.getQueue(name).add(...)` enqueue (spec §4.7 "In-process queue").
    pub fn internal() -> Self {
        Self {
            kind: TriggerType::Event,
            subject: Some("internal".to_string()),
            message_id: None,
        }
    }

    /// External-trigger subscription delivery (spec §4.7 "External-trigger subscriptions").
    pub fn event(subject: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            kind: TriggerType::Event,
            subject: Some(subject.into()),
            message_id: Some(message_id.into()),
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
