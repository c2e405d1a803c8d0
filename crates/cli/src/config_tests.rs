// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_all() {
    for key in ["NATS_URL", "FEED_INTERNAL_TOKEN", "DATABASE_URL", "FEED_API_BASE_URL", "FEED_MODULES_DIR", "OLLAMA_EMBED_DIM"] {
        std::env::remove_var(key);
    }
}

#[test]
fn missing_required_variable_is_reported_by_name() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_all();
    std::env::set_var("FEED_INTERNAL_TOKEN", "tok");
    std::env::set_var("DATABASE_URL", "postgres://x");

    let err = from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnv("NATS_URL")));
    clear_all();
}

#[test]
fn defaults_fill_in_optional_variables() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_all();
    std::env::set_var("NATS_URL", "nats://localhost:4222");
    std::env::set_var("FEED_INTERNAL_TOKEN", "tok");
    std::env::set_var("DATABASE_URL", "postgres://x");

    let config = from_env().unwrap();
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.modules_dir, PathBuf::from(DEFAULT_MODULES_DIR));
    assert_eq!(config.ollama_embed_dim, DEFAULT_OLLAMA_EMBED_DIM);
    clear_all();
}

#[test]
fn invalid_embed_dim_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_all();
    std::env::set_var("NATS_URL", "nats://localhost:4222");
    std::env::set_var("FEED_INTERNAL_TOKEN", "tok");
    std::env::set_var("DATABASE_URL", "postgres://x");
    std::env::set_var("OLLAMA_EMBED_DIM", "0");

    let err = from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInt("OLLAMA_EMBED_DIM", _)));
    clear_all();
}
