// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::settings::SettingsClient;

#[derive(Default)]
pub struct FakeSettingsClient {
    by_module: Mutex<HashMap<String, HashMap<String, Option<String>>>>,
}

impl FakeSettingsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, module: impl Into<String>, settings: HashMap<String, Option<String>>) {
        self.by_module.lock().insert(module.into(), settings);
    }
}

#[async_trait]
impl SettingsClient for FakeSettingsClient {
    async fn fetch_settings(&self, module: &str) -> HashMap<String, Option<String>> {
        self.by_module.lock().get(module).cloned().unwrap_or_default()
    }
}
