// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use feedeater_core::SystemClock;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn backoff_caps_at_five_seconds() {
    let backoff = HttpSettingsClient::<SystemClock>::backoff_for_attempt(20);
    assert_eq!(backoff, ChronoDuration::milliseconds(5000));
}

#[test]
fn backoff_grows_exponentially_from_250ms() {
    assert_eq!(
        HttpSettingsClient::<SystemClock>::backoff_for_attempt(1),
        ChronoDuration::milliseconds(250)
    );
    assert_eq!(
        HttpSettingsClient::<SystemClock>::backoff_for_attempt(2),
        ChronoDuration::milliseconds(400)
    );
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/settings/github"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/internal/settings/github"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "settings": [{"key": "ollama_embed_dim", "value": "4096"}]
        })))
        .mount(&server)
        .await;

    let client = HttpSettingsClient::new(server.uri(), "test-token", SystemClock);
    let settings = client.fetch_settings("github").await;
    assert_eq!(settings.get("ollama_embed_dim"), Some(&Some("4096".to_string())));
}
