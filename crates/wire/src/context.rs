// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ContextUpdated` wire event, consumed on `feedeater.*.contextUpdated` (spec §4.6, §6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPayload {
    #[serde(rename = "ownerModule")]
    pub owner_module: String,
    #[serde(rename = "sourceKey", skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    #[serde(rename = "summaryShort")]
    pub summary_short: String,
    #[serde(rename = "summaryLong")]
    pub summary_long: String,
    #[serde(rename = "keyPoints", skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextUpdatedEvent {
    #[serde(rename = "type")]
    pub kind: ContextUpdatedKind,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub context: ContextPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextUpdatedKind {
    ContextUpdated,
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
