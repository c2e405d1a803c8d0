// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus subject name construction and parsing (spec §6 "Bus subjects").

/// Wildcard subject the dispatcher subscribes to: every job-run event.
pub const JOBS_WILDCARD: &str = "feedeater.jobs.>";

/// Wildcard subject the context upserter subscribes to: every module's
/// `contextUpdated` subject (exactly one token for the module).
pub const CONTEXT_UPDATED_WILDCARD: &str = "feedeater.*.contextUpdated";

/// Wildcard subject the archiver subscribes to: every module's
/// `messageCreated` subject (exactly one token for the module).
pub const MESSAGE_CREATED_WILDCARD: &str = "feedeater.*.messageCreated";

/// Subject the worker publishes structured log events on.
pub const WORKER_LOG_SUBJECT: &str = "feedeater.worker.log";

/// `feedeater.jobs.<module>.<queue>.<job>`
pub fn job_run_subject(module: &str, queue: &str, job: &str) -> String {
    format!("feedeater.jobs.{module}.{queue}.{job}")
}

/// `feedeater.<module>.messageCreated`
pub fn message_created_subject(module: &str) -> String {
    format!("feedeater.{module}.messageCreated")
}

/// `feedeater.<module>.contextUpdated`
pub fn context_updated_subject(module: &str) -> String {
    format!("feedeater.{module}.contextUpdated")
}

/// Split a concrete `feedeater.jobs.<module>.<queue>.<job>` subject into its
/// three trailing segments. Returns `None` if the subject doesn't have the
/// expected shape (wrong prefix or segment count).
pub fn parse_job_run_subject(subject: &str) -> Option<(&str, &str, &str)> {
    let rest = subject.strip_prefix("feedeater.jobs.")?;
    let mut parts = rest.splitn(3, '.');
    let module = parts.next()?;
    let queue = parts.next()?;
    let job = parts.next()?;
    if module.is_empty() || queue.is_empty() || job.is_empty() {
        return None;
    }
    Some((module, queue, job))
}

/// Extract the module token from a concrete `feedeater.<module>.contextUpdated`
/// subject.
pub fn parse_context_updated_subject(subject: &str) -> Option<&str> {
    subject.strip_suffix(".contextUpdated")?.strip_prefix("feedeater.")
}

#[cfg(test)]
#[path = "subject_tests.rs"]
mod tests;
