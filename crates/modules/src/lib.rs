// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module discovery & runtime loader (spec §4.3 "Module discovery & runtime
//! loader (C3)").

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod discovery;
mod handler;
mod manifest;
mod registry;

pub use handler::{EnqueueRequest, Handler, HandlerOutcome, JobContext, JobInvocation};
pub use manifest::{parse_manifest, JobDef, ModuleManifest, RuntimeDef};
pub use registry::{FailedModule, Registry};
