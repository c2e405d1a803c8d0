// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::handler::{HandlerOutcome, JobContext, JobInvocation};
use async_trait::async_trait;
use std::fs;

struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn invoke(&self, _ctx: &JobContext, _invocation: JobInvocation) -> Result<HandlerOutcome, String> {
        Ok(HandlerOutcome::default())
    }
}

fn write_manifest(dir: &Path, module: &str, body: &str) {
    let module_dir = dir.join(module);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join("manifest.json"), body).unwrap();
}

#[test]
fn handler_is_shared_across_every_declared_job() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "github",
        r#"{
            "name": "github",
            "jobs": [
                {"name": "collectEvents", "queue": "mod_github"},
                {"name": "onMention", "queue": "mod_github"}
            ],
            "runtime": {"entry": "./entry.js"}
        }"#,
    );

    let registry = Registry::discover(dir.path(), |_manifest| Ok(Arc::new(EchoHandler)));

    assert!(registry.handler("github", "mod_github", "collectEvents").is_some());
    assert!(registry.handler("github", "mod_github", "onMention").is_some());
    assert!(registry.handler("github", "mod_github", "missing").is_none());
    assert!(registry.failed_modules().is_empty());
}

#[test]
fn module_with_no_runtime_has_no_handlers_but_stays_registered() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "noop", r#"{"name": "noop", "jobs": [{"name": "x", "queue": "q"}]}"#);

    let registry = Registry::discover(dir.path(), |_manifest| Ok(Arc::new(EchoHandler)));

    assert!(registry.handler("noop", "q", "x").is_none());
    assert_eq!(registry.module_names(), vec!["noop".to_string()]);
}

#[test]
fn runtime_load_failure_is_recorded_but_does_not_abort_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "flaky",
        r#"{"name": "flaky", "jobs": [], "runtime": {"entry": "./entry.js"}}"#,
    );
    write_manifest(dir.path(), "ok", r#"{"name": "ok", "jobs": [], "runtime": {"entry": "./entry.js"}}"#);

    let registry = Registry::discover(dir.path(), |manifest| {
        if manifest.name == "flaky" {
            Err("spawn failed".to_string())
        } else {
            Ok(Arc::new(EchoHandler))
        }
    });

    assert_eq!(registry.failed_modules().len(), 1);
    assert_eq!(registry.failed_modules()[0].name, "flaky");
    assert_eq!(registry.module_names().len(), 2);
}
