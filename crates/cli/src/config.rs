// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment parsing (spec §6 "Configuration (environment)"). The daemon
//! crate never touches `std::env` itself; this is the only place that does.

use std::path::PathBuf;

use feedeater_core::TaxonomyError;
use feedeater_daemon::Config;
use thiserror::Error;

const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_MODULES_DIR: &str = "/app/modules";
const DEFAULT_OLLAMA_EMBED_DIM: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
    #[error("environment variable {0} must be a positive integer, got {1:?}")]
    InvalidInt(&'static str, String),
}

impl ConfigError {
    pub fn kind(&self) -> TaxonomyError {
        TaxonomyError::Configuration
    }
}

/// Read the worker's configuration from the process environment. A missing
/// required variable is a fatal configuration error (spec §7).
pub fn from_env() -> Result<Config, ConfigError> {
    Ok(Config {
        nats_url: require_env("NATS_URL")?,
        internal_token: require_env("FEED_INTERNAL_TOKEN")?,
        database_url: require_env("DATABASE_URL")?,
        api_base_url: optional_env("FEED_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        modules_dir: PathBuf::from(optional_env("FEED_MODULES_DIR").unwrap_or_else(|| DEFAULT_MODULES_DIR.to_string())),
        ollama_embed_dim: match optional_env("OLLAMA_EMBED_DIM") {
            Some(raw) => parse_positive_u32("OLLAMA_EMBED_DIM", &raw)?,
            None => DEFAULT_OLLAMA_EMBED_DIM,
        },
    })
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    optional_env(name).ok_or(ConfigError::MissingEnv(name))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_positive_u32(name: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.parse::<u32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::InvalidInt(name, raw.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
