// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replayer (spec §4.8 "Replayer (C8)"): on startup, re-emit archived
//! messages inside the configured lookback window, skipping those already
//! re-emitted in this window.

use chrono::{DateTime, Duration, Utc};
use feedeater_bus::Bus;
use feedeater_storage::{DedupeRepository, MessageRepository};
use feedeater_wire::{message_created_subject, MessageCreatedEnvelope, NormalizedMessage};
use tracing::{error, warn};

/// Run one replay pass. `now` is the instant the pass is anchored to;
/// `lookback_minutes` is `dashboard_bus_history_minutes` from settings,
/// already normalized to a non-negative value by the caller.
pub async fn run<B, S>(bus: &B, store: &S, now: DateTime<Utc>, lookback_minutes: i64)
where
    B: Bus,
    S: MessageRepository + DedupeRepository,
{
    let cutoff = now - Duration::minutes(lookback_minutes);

    match store.purge_older_than(cutoff).await {
        Ok(purged) if purged > 0 => tracing::info!(purged, "purged stale replay dedupe rows"),
        Ok(_) => {}
        Err(err) => warn!(error = %err, "failed to purge replay dedupe rows, continuing"),
    }

    let candidates = match store.select_replay_candidates(cutoff).await {
        Ok(candidates) => candidates,
        Err(err) => {
            error!(error = %err, "failed to select replay candidates, skipping replay");
            return;
        }
    };

    for candidate in candidates {
        let mut message: NormalizedMessage = match serde_json::from_value(candidate.raw_json) {
            Ok(message) => message,
            Err(err) => {
                warn!(message_id = %candidate.id, error = %err, "skipping unreplayable archived message");
                continue;
            }
        };
        message.realtime = Some(false);

        let subject = message_created_subject(&message.source.module);
        let envelope = MessageCreatedEnvelope::wrap(message);
        let payload = match serde_json::to_vec(&envelope) {
            Ok(payload) => payload,
            Err(err) => {
                error!(message_id = %candidate.id, error = %err, "failed to encode replayed message");
                continue;
            }
        };

        if let Err(err) = bus.publish(&subject, payload).await {
            error!(message_id = %candidate.id, error = %err, "failed to republish archived message, skipping dedupe mark");
            continue;
        }

        if let Err(err) = store.mark_emitted(&candidate.id, now).await {
            error!(message_id = %candidate.id, error = %err, "failed to mark replayed message as emitted");
        }
    }
}

#[cfg(test)]
#[path = "replayer_tests.rs"]
mod tests;
