// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module manifest shape (spec §3 "Module manifest", §4.3).

use serde::{Deserialize, Serialize};

/// A single job declared by a module manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDef {
    pub name: String,
    pub queue: String,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default, rename = "triggeredBy")]
    pub triggered_by: Option<String>,
}

/// Runtime entry declaration. A manifest without `runtime` is kept in the
/// registry but contributes no handlers (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDef {
    pub entry: String,
}

/// `{name, jobs[], runtime?{entry}}` (spec §3 "Module manifest").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<JobDef>,
    #[serde(default)]
    pub runtime: Option<RuntimeDef>,
}

pub fn parse_manifest(content: &str) -> Result<ModuleManifest, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
