// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON protocol spoken with a module's `runtime.entry`
//! subprocess: one request line in, one response line out per invocation
//! (spec §4.3, §9 redesign note "dynamic handler dispatch → static tables").

use serde::{Deserialize, Serialize};
use serde_json::Value;

use feedeater_modules::{EnqueueRequest, HandlerOutcome, JobContext, JobInvocation};

#[derive(Debug, Serialize)]
pub(crate) struct WireRequest<'a> {
    pub module: &'a str,
    pub modules_dir: String,
    pub settings: &'a std::collections::HashMap<String, Option<String>>,
    #[serde(rename = "dbDsn")]
    pub db_dsn: &'a str,
    #[serde(rename = "busUrl")]
    pub bus_url: &'a str,
    pub queue: &'a str,
    pub job: &'a str,
    pub id: String,
    pub data: &'a Option<Value>,
}

impl<'a> WireRequest<'a> {
    pub(crate) fn from_invocation(ctx: &'a JobContext, invocation: &'a JobInvocation) -> Self {
        Self {
            module: &ctx.module_name,
            modules_dir: ctx.modules_dir.display().to_string(),
            settings: &ctx.settings,
            db_dsn: &ctx.db_dsn,
            bus_url: &ctx.bus_url,
            queue: &invocation.queue,
            job: &invocation.name,
            id: invocation.id.to_string(),
            data: &invocation.data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub metrics: Option<Value>,
    #[serde(default)]
    pub enqueue: Vec<WireEnqueue>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEnqueue {
    #[serde(rename = "jobName")]
    pub job_name: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl WireResponse {
    pub(crate) fn into_outcome(self) -> Result<HandlerOutcome, String> {
        if !self.ok {
            return Err(self.error.unwrap_or_else(|| "module runtime reported failure".to_string()));
        }
        Ok(HandlerOutcome {
            metrics: self.metrics,
            enqueue: self
                .enqueue
                .into_iter()
                .map(|e| EnqueueRequest {
                    job_name: e.job_name,
                    data: e.data,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
