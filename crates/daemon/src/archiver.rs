// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus archiver (spec §4.5 "Bus archiver (C5)"): persists every
//! `MessageCreated` message into `bus_messages`, at most once per `id`.

use std::sync::Arc;

use feedeater_bus::Bus;
use feedeater_storage::{ArchivedMessageRow, MessageRepository};
use feedeater_wire::{decode_message_created, MESSAGE_CREATED_WILDCARD};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Subscribe to `feedeater.*.messageCreated` and archive every accepted
/// message until `cancel` fires or the bus subscription closes.
pub async fn run<B, S>(bus: Arc<B>, store: Arc<S>, cancel: CancellationToken)
where
    B: Bus,
    S: MessageRepository,
{
    let mut subscription = match bus.subscribe(MESSAGE_CREATED_WILDCARD).await {
        Ok(subscription) => subscription,
        Err(err) => {
            error!(error = %err, "archiver failed to subscribe, loop will not run");
            return;
        }
    };

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = subscription.next() => message,
        };
        let Some(message) = message else { break };

        let decoded = match decode_message_created(&message.payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(subject = %message.subject, error = %err, "dropping unparseable messageCreated payload");
                continue;
            }
        };

        let row = ArchivedMessageRow {
            id: decoded.id.clone(),
            source_module: decoded.source.module.clone(),
            source_stream: decoded.source.stream.clone(),
            created_at: decoded.created_at,
            raw_json: serde_json::to_value(&decoded).unwrap_or(serde_json::Value::Null),
            tags_json: decoded.tags.as_ref().map(|tags| serde_json::json!(tags)),
            from: decoded.from.clone(),
            message: Some(decoded.message.clone()),
        };

        if let Err(err) = store.insert_if_absent(row).await {
            error!(message_id = %decoded.id, error = %err, "failed to archive message, dropping");
        }
    }
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;
