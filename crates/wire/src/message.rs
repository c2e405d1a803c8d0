// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `NormalizedMessage` and the `MessageCreated` envelope (spec §3, §4.5, §4.7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSource {
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRef {
    #[serde(rename = "ownerModule")]
    pub owner_module: String,
    #[serde(rename = "sourceKey")]
    pub source_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub source: MessageSource,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "From", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "isDirectMention", default)]
    pub is_direct_mention: bool,
    #[serde(rename = "isDigest", default)]
    pub is_digest: bool,
    #[serde(rename = "isSystemMessage", default)]
    pub is_system_message: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "contextRef", skip_serializing_if = "Option::is_none")]
    pub context_ref: Option<ContextRef>,
    #[serde(rename = "followMePanel", skip_serializing_if = "Option::is_none")]
    pub follow_me_panel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedEnvelope {
    #[serde(rename = "type")]
    pub kind: MessageCreatedKind,
    pub message: NormalizedMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCreatedKind {
    MessageCreated,
}

impl MessageCreatedEnvelope {
    pub fn wrap(message: NormalizedMessage) -> Self {
        Self { kind: MessageCreatedKind::MessageCreated, message }
    }
}

#[derive(Debug, Error)]
pub enum MessageDecodeError {
    #[error("payload is neither a bare NormalizedMessage nor a MessageCreated envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Accept both payload shapes documented for `feedeater.<module>.messageCreated`
/// (spec §4.5, §6): a bare `NormalizedMessage`, or `{type:"MessageCreated",
/// message: NormalizedMessage}`.
pub fn decode_message_created(payload: &[u8]) -> Result<NormalizedMessage, MessageDecodeError> {
    if let Ok(envelope) = serde_json::from_slice::<MessageCreatedEnvelope>(payload) {
        return Ok(envelope.message);
    }
    Ok(serde_json::from_slice::<NormalizedMessage>(payload)?)
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
