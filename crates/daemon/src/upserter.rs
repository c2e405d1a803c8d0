// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context upserter (spec §4.6 "Context upserter (C6)"): applies
//! `ContextUpdated` events as versioned upserts with embedding validation.

use std::sync::Arc;

use feedeater_bus::Bus;
use feedeater_storage::ContextRepository;
use feedeater_wire::CONTEXT_UPDATED_WILDCARD;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use uuid::Uuid;

const SUMMARY_SHORT_MAX_CHARS: usize = 128;

/// Subscribe to `feedeater.*.contextUpdated` and apply every well-formed
/// event until `cancel` fires or the bus subscription closes. `embed_dim`
/// is the process-global embedding dimension captured at boot (spec §5).
pub async fn run<B, S>(bus: Arc<B>, store: Arc<S>, embed_dim: u32, cancel: CancellationToken)
where
    B: Bus,
    S: ContextRepository,
{
    let mut subscription = match bus.subscribe(CONTEXT_UPDATED_WILDCARD).await {
        Ok(subscription) => subscription,
        Err(err) => {
            error!(error = %err, "context upserter failed to subscribe, loop will not run");
            return;
        }
    };

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = subscription.next() => message,
        };
        let Some(message) = message else { break };

        let event: feedeater_wire::ContextUpdatedEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(err) => {
                warn!(subject = %message.subject, error = %err, "dropping malformed contextUpdated event");
                continue;
            }
        };

        if let Err(err) = apply(&*store, embed_dim, event).await {
            warn!(error = %err, "failed to apply contextUpdated event, dropping");
        }
    }
}

async fn apply<S: ContextRepository>(
    store: &S,
    embed_dim: u32,
    event: feedeater_wire::ContextUpdatedEvent,
) -> Result<(), String> {
    let context = event.context;
    let source_key = context
        .source_key
        .or_else(|| event.message_id.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let summary_short: String = context.summary_short.chars().take(SUMMARY_SHORT_MAX_CHARS).collect();

    let embedding = context.embedding.filter(|e| !e.is_empty() && e.len() as u32 == embed_dim);
    let key_points = context.key_points.unwrap_or_default();

    let result = store
        .upsert(
            &context.owner_module,
            &source_key,
            &summary_short,
            &context.summary_long,
            &key_points,
            embedding.as_deref(),
            event.created_at,
        )
        .await
        .map_err(|e| e.to_string())?;

    if let Some(message_id) = event.message_id {
        store
            .insert_link(&result.row.id, &message_id, event.created_at)
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "upserter_tests.rs"]
mod tests;
