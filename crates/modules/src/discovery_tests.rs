// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;

fn write_manifest(dir: &Path, module: &str, body: &str) {
    let module_dir = dir.join(module);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join(MANIFEST_FILE_NAME), body).unwrap();
}

#[test]
fn discovers_and_sorts_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "zeta", r#"{"name": "zeta", "jobs": []}"#);
    write_manifest(dir.path(), "alpha", r#"{"name": "alpha", "jobs": []}"#);

    let (manifests, failed) = load_manifests(dir.path());
    assert!(failed.is_empty());
    assert_eq!(manifests.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["alpha", "zeta"]);
}

#[test]
fn malformed_manifest_is_recorded_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "broken", "{not json");
    write_manifest(dir.path(), "good", r#"{"name": "good", "jobs": []}"#);

    let (manifests, failed) = load_manifests(dir.path());
    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].name, "good");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "broken");
}

#[test]
fn missing_directory_returns_empty_without_panicking() {
    let (manifests, failed) = load_manifests(Path::new("/nonexistent/feedeater/modules"));
    assert!(manifests.is_empty());
    assert!(failed.is_empty());
}

#[test]
fn subdirectory_without_manifest_file_is_recorded_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("empty")).unwrap();

    let (manifests, failed) = load_manifests(dir.path());
    assert!(manifests.is_empty());
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "empty");
}
