// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns a module's `runtime.entry` as a long-lived subprocess and speaks
//! the newline-delimited JSON protocol to it, presenting the result as a
//! [`feedeater_modules::Handler`] (spec §4.3).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use feedeater_modules::{Handler, HandlerOutcome, JobContext, JobInvocation};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::ExecError;
use crate::protocol::{WireRequest, WireResponse};

const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// A module runtime reached over stdio. Invocations are serialized through
/// an internal mutex since the protocol is strictly request/response over a
/// single pipe pair.
pub struct ProcessHandler {
    session: Mutex<Session>,
    entry: String,
    response_timeout: Duration,
}

impl ProcessHandler {
    /// Spawn `entry` with `modules_dir/<module>` as its working directory.
    pub async fn spawn(entry: &str, working_dir: &Path) -> Result<Self, ExecError> {
        Self::spawn_with_timeout(entry, working_dir, DEFAULT_RESPONSE_TIMEOUT).await
    }

    pub async fn spawn_with_timeout(
        entry: &str,
        working_dir: &Path,
        response_timeout: Duration,
    ) -> Result<Self, ExecError> {
        let mut command = Command::new(entry);
        command
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = command.spawn().map_err(|source| ExecError::Spawn {
            entry: entry.to_string(),
            source,
        })?;

        info!(entry, "module runtime started");
        Ok(Self::from_child(entry.to_string(), child, response_timeout))
    }

    fn from_child(entry: String, mut child: Child, response_timeout: Duration) -> Self {
        // Allow expect here: both spawn paths always set Stdio::piped() for
        // stdin and stdout, so `take()` can't observe `None`.
        #[allow(clippy::expect_used)]
        let stdin = child.stdin.take().expect("stdin was piped");
        #[allow(clippy::expect_used)]
        let stdout = child.stdout.take().expect("stdout was piped");
        if let Some(stderr) = child.stderr.take() {
            spawn_stderr_logger(entry.clone(), stderr);
        }

        Self {
            session: Mutex::new(Session {
                child,
                stdin,
                stdout: BufReader::new(stdout).lines(),
            }),
            entry,
            response_timeout,
        }
    }
}

fn spawn_stderr_logger(entry: String, stderr: tokio::process::ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            warn!(entry = %entry, "module runtime stderr: {line}");
        }
    });
}

#[async_trait]
impl Handler for ProcessHandler {
    async fn invoke(&self, ctx: &JobContext, invocation: JobInvocation) -> Result<HandlerOutcome, String> {
        let request = WireRequest::from_invocation(ctx, &invocation);
        let mut line = serde_json::to_string(&request).map_err(|e| e.to_string())?;
        line.push('\n');

        let mut session = self.session.lock().await;

        if let Some(status) = session
            .child
            .try_wait()
            .map_err(|e| format!("failed to poll module runtime: {e}"))?
        {
            return Err(format!("module runtime '{}' already exited with {status}", self.entry));
        }

        session
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| format!("failed to write request to module runtime: {e}"))?;
        session
            .stdin
            .flush()
            .await
            .map_err(|e| format!("failed to flush request to module runtime: {e}"))?;

        let raw = tokio::time::timeout(self.response_timeout, session.stdout.next_line())
            .await
            .map_err(|_| ExecError::Timeout.to_string())?
            .map_err(|e| format!("failed to read response from module runtime: {e}"))?
            .ok_or_else(|| ExecError::Closed.to_string())?;

        let response: WireResponse = serde_json::from_str(&raw).map_err(|e| format!("{}: {raw}", ExecError::Protocol(e)))?;
        response.into_outcome()
    }
}

#[cfg(test)]
#[path = "process_handler_tests.rs"]
mod tests;
