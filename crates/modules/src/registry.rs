// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module registry (spec §4.3): discovers manifests, loads each module's
//! runtime once, and exposes handlers keyed by `(module, queue, job)`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::discovery::load_manifests;
use crate::handler::Handler;
use crate::manifest::{JobDef, ModuleManifest};

/// A module whose manifest failed to load, or whose runtime failed to
/// start (spec §4.3 "recorded in a failed-modules list").
#[derive(Debug, Clone)]
pub struct FailedModule {
    pub name: String,
    pub path: PathBuf,
    pub error: String,
}

struct LoadedModule {
    manifest: ModuleManifest,
    handlers: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

/// `map<(module, queue, job), Handler>`, loaded at most once per module per
/// process (spec §3 "Module runtime").
pub struct Registry {
    modules: HashMap<String, LoadedModule>,
    failed: Vec<FailedModule>,
}

impl Registry {
    /// Discover manifests under `modules_dir` and load a runtime for each
    /// one that declares `runtime.entry`, via `load_runtime`. A module whose
    /// runtime fails to load keeps its manifest in the registry with no
    /// handlers and is recorded in `failed_modules()` (spec §4.3).
    pub fn discover(
        modules_dir: &Path,
        mut load_runtime: impl FnMut(&ModuleManifest) -> Result<Arc<dyn Handler>, String>,
    ) -> Self {
        let (manifests, mut failed) = load_manifests(modules_dir);
        let mut modules = HashMap::new();

        for manifest in manifests {
            let handlers = match &manifest.runtime {
                Some(_) => match load_runtime(&manifest) {
                    Ok(handler) => index_handlers(&manifest.jobs, handler),
                    Err(err) => {
                        warn!(module = %manifest.name, error = %err, "failed to load module runtime");
                        failed.push(FailedModule {
                            name: manifest.name.clone(),
                            path: modules_dir.join(&manifest.name),
                            error: err,
                        });
                        HashMap::new()
                    }
                },
                None => HashMap::new(),
            };

            let name = manifest.name.clone();
            modules.insert(name, LoadedModule { manifest, handlers });
        }

        Self { modules, failed }
    }

    pub fn handler(&self, module: &str, queue: &str, job: &str) -> Option<Arc<dyn Handler>> {
        self.modules.get(module)?.handlers.get(queue)?.get(job).cloned()
    }

    pub fn failed_modules(&self) -> &[FailedModule] {
        &self.failed
    }

    /// Every declared job across every loaded manifest, alongside the
    /// module that declared it — used by the orchestrator to wire cron
    /// schedules and external-trigger subscriptions (spec §4.9, §4.7).
    pub fn all_jobs(&self) -> Vec<(String, JobDef)> {
        self.modules
            .values()
            .flat_map(|m| m.manifest.jobs.iter().map(move |job| (m.manifest.name.clone(), job.clone())))
            .collect()
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }
}

fn index_handlers(jobs: &[JobDef], handler: Arc<dyn Handler>) -> HashMap<String, HashMap<String, Arc<dyn Handler>>> {
    let mut by_queue: HashMap<String, HashMap<String, Arc<dyn Handler>>> = HashMap::new();
    for job in jobs {
        by_queue
            .entry(job.queue.clone())
            .or_default()
            .insert(job.name.clone(), handler.clone());
    }
    by_queue
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
