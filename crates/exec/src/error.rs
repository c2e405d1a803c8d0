// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn module runtime '{entry}': {source}")]
    Spawn {
        entry: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error communicating with module runtime: {0}")]
    Io(#[from] std::io::Error),
    #[error("module runtime did not respond within the configured timeout")]
    Timeout,
    #[error("module runtime closed its stdout without a response")]
    Closed,
    #[error("malformed response from module runtime: {0}")]
    Protocol(#[from] serde_json::Error),
}
