// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal boot-path errors (spec §7 "Configuration error ... fatal at boot").
//! Once [`crate::orchestrator::run`] returns `Ok`, no single-event failure
//! it encounters afterward is allowed to propagate here.

use feedeater_core::TaxonomyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootError {
    #[error("failed to connect to the bus: {0}")]
    Bus(#[from] feedeater_bus::BusError),
    #[error("failed to open the database pool: {0}")]
    Storage(#[from] feedeater_storage::StorageError),
}

impl BootError {
    pub fn kind(&self) -> TaxonomyError {
        TaxonomyError::Configuration
    }
}
