// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use feedeater_core::TaxonomyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus connect error: {0}")]
    Connect(String),
    #[error("bus publish error: {0}")]
    Publish(String),
    #[error("bus subscribe error: {0}")]
    Subscribe(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("non-2xx response: {0}")]
    Status(u16),
}

impl SettingsError {
    /// Both variants are retried forever by [`crate::settings::SettingsClient`]
    /// (spec §4.2), so both map onto the same transient category.
    pub fn kind(&self) -> TaxonomyError {
        TaxonomyError::TransientIo
    }
}
