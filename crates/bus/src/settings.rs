// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings client (spec §4.2 "Settings client (C2)"): fetch per-module
//! key→value settings with unbounded exponential-backoff retry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use feedeater_core::Clock;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SettingsError;

#[async_trait]
pub trait SettingsClient: Send + Sync {
    /// Fetch settings for `module`. Never returns an error: on any transport
    /// or non-2xx failure it retries with backoff forever (spec §4.2
    /// "unbounded attempts").
    async fn fetch_settings(&self, module: &str) -> HashMap<String, Option<String>>;
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    settings: Vec<SettingEntry>,
}

#[derive(Debug, Deserialize)]
struct SettingEntry {
    key: String,
    value: Option<String>,
}

pub struct HttpSettingsClient<C: Clock> {
    http: reqwest::Client,
    base_url: String,
    internal_token: String,
    clock: C,
}

impl<C: Clock> HttpSettingsClient<C> {
    pub fn new(base_url: impl Into<String>, internal_token: impl Into<String>, clock: C) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            internal_token: internal_token.into(),
            clock,
        }
    }

    async fn try_fetch(&self, module: &str) -> Result<HashMap<String, Option<String>>, SettingsError> {
        let url = format!("{}/api/internal/settings/{}", self.base_url.trim_end_matches('/'), module);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.internal_token)
            .send()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SettingsError::Status(response.status().as_u16()));
        }

        let body: SettingsResponse = response
            .json()
            .await
            .map_err(|e| SettingsError::Transport(e.to_string()))?;
        Ok(body.settings.into_iter().map(|e| (e.key, e.value)).collect())
    }

    /// `min(5s, 250ms * 1.6^(n-1))` (spec §4.2), `n` = 1-indexed attempt number.
    fn backoff_for_attempt(attempt: u32) -> ChronoDuration {
        let ms = (250.0 * 1.6f64.powi((attempt - 1) as i32)).min(5000.0);
        ChronoDuration::milliseconds(ms as i64)
    }
}

#[async_trait]
impl<C: Clock> SettingsClient for HttpSettingsClient<C> {
    async fn fetch_settings(&self, module: &str) -> HashMap<String, Option<String>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_fetch(module).await {
                Ok(settings) => {
                    if attempt > 1 {
                        info!(module, failed_attempts = attempt - 1, "settings fetch recovered");
                    }
                    return settings;
                }
                Err(err) => {
                    warn!(module, attempt, kind = %err.kind(), error = %err, "settings fetch failed, retrying");
                    let deadline = self.clock.now_utc() + Self::backoff_for_attempt(attempt);
                    self.clock.sleep_until(deadline).await;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
