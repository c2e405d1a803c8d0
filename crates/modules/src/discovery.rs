// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module manifest discovery: enumerate subdirectories of `FEED_MODULES_DIR`,
//! each containing a `manifest.json` (spec §4.3 "Discovery").

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::manifest::{parse_manifest, ModuleManifest};
use crate::registry::FailedModule;

const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Enumerate every subdirectory of `modules_dir` containing a manifest.
/// A subdirectory whose manifest is missing, unreadable, or malformed is
/// skipped and recorded in the failed list rather than aborting discovery
/// (spec §4.3 "Failure to load a module ... does NOT abort startup").
pub fn load_manifests(modules_dir: &Path) -> (Vec<ModuleManifest>, Vec<FailedModule>) {
    let mut manifests = Vec::new();
    let mut failed = Vec::new();

    let entries = match fs::read_dir(modules_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %modules_dir.display(), error = %err, "modules directory unreadable");
            return (manifests, failed);
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let dir_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest_path = path.join(MANIFEST_FILE_NAME);

        let content = match fs::read_to_string(&manifest_path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %manifest_path.display(), error = %err, "skipping module with unreadable manifest");
                failed.push(FailedModule {
                    name: dir_name,
                    path,
                    error: err.to_string(),
                });
                continue;
            }
        };

        match parse_manifest(&content) {
            Ok(manifest) => manifests.push(manifest),
            Err(err) => {
                warn!(path = %manifest_path.display(), error = %err, "skipping module with invalid manifest");
                failed.push(FailedModule {
                    name: dir_name,
                    path,
                    error: err.to_string(),
                });
            }
        }
    }

    manifests.sort_by(|a, b| a.name.cmp(&b.name));
    (manifests, failed)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
