// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical wire types and subject names shared by every bus-facing
//! component (spec §3 "Normalized message" / "Job-run event", §6 "Bus
//! subjects").

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod context;
mod job_run;
mod log;
mod message;
mod subject;
mod trigger;

pub use context::{ContextPayload, ContextUpdatedEvent, ContextUpdatedKind};
pub use job_run::{JobRunEvent, JobRunEventKind};
pub use log::{LogLevel, WorkerLogEvent};
pub use message::{
    decode_message_created, ContextRef, MessageCreatedEnvelope, MessageCreatedKind,
    MessageDecodeError, MessageSource, NormalizedMessage,
};
pub use subject::{
    context_updated_subject, job_run_subject, message_created_subject,
    parse_context_updated_subject, parse_job_run_subject, CONTEXT_UPDATED_WILDCARD,
    JOBS_WILDCARD, MESSAGE_CREATED_WILDCARD, WORKER_LOG_SUBJECT,
};
pub use trigger::{Trigger, TriggerType};
