// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime daemon: the cron engine, dispatcher, archiver, upserter and
//! replayer components wired together by [`orchestrator::run`]. Everything
//! in here is storage/bus-generic so it can be driven by either the
//! production adapters or the fakes in tests.

mod archiver;
mod config;
mod dispatcher;
mod error;
mod log_bridge;
mod orchestrator;
mod replayer;
mod upserter;

pub use config::Config;
pub use error::BootError;
pub use log_bridge::BusLogLayer;
pub use orchestrator::run;

/// Component entrypoints, exposed only so the root integration-test package
/// can drive each one directly against fakes without a real bus/database.
/// Production code only ever reaches these through [`orchestrator::run`].
#[cfg(any(test, feature = "test-support"))]
pub use archiver::run as run_archiver;
#[cfg(any(test, feature = "test-support"))]
pub use dispatcher::run as run_dispatcher;
#[cfg(any(test, feature = "test-support"))]
pub use replayer::run as run_replayer;
#[cfg(any(test, feature = "test-support"))]
pub use upserter::run as run_upserter;
