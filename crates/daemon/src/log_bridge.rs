// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirrors `info`-and-above `tracing` events onto `feedeater.worker.log`
//! (spec §6 "External interfaces"). [`BusLogLayer`] is registered on the
//! global subscriber before anything else logs; [`run`] drains the events
//! it captures and publishes them once the bus connection is up.

use std::sync::Arc;

use chrono::Utc;
use feedeater_bus::Bus;
use feedeater_wire::{LogLevel, WorkerLogEvent, WORKER_LOG_SUBJECT};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A `tracing_subscriber::Layer` that never blocks the logging call site:
/// every accepted event is pushed onto an unbounded channel and converted
/// to wire form only once, here, rather than re-parsed downstream.
pub struct BusLogLayer {
    sender: UnboundedSender<WorkerLogEvent>,
}

impl BusLogLayer {
    pub fn new() -> (Self, UnboundedReceiver<WorkerLogEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<S: Subscriber> Layer<S> for BusLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(level) = wire_level(event.metadata().level()) else { return };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut log = WorkerLogEvent::new(level, Utc::now(), visitor.message);
        if !visitor.fields.is_empty() {
            log = log.with_meta(serde_json::Value::Object(visitor.fields));
        }

        // The receiver only stops draining at shutdown; an event dropped
        // after that point has nowhere left to go.
        let _ = self.sender.send(log);
    }
}

fn wire_level(level: &Level) -> Option<LogLevel> {
    match *level {
        Level::ERROR => Some(LogLevel::Error),
        Level::WARN => Some(LogLevel::Warn),
        Level::INFO => Some(LogLevel::Info),
        Level::DEBUG | Level::TRACE => None,
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(rendered));
        }
    }
}

/// Drain `receiver` and publish each event until `cancel` fires or the
/// channel closes. Publish failures are dropped silently: this loop is
/// itself a logging sink, so it must not log its own errors back into
/// the channel it's draining.
pub async fn run<B: Bus>(bus: Arc<B>, mut receiver: UnboundedReceiver<WorkerLogEvent>, cancel: CancellationToken) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = receiver.recv() => event,
        };
        let Some(event) = event else { break };

        if let Ok(payload) = serde_json::to_vec(&event) {
            let _ = bus.publish(WORKER_LOG_SUBJECT, payload).await;
        }
    }
}

#[cfg(test)]
#[path = "log_bridge_tests.rs"]
mod tests;
