// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_message(id: &str) -> NormalizedMessage {
    NormalizedMessage {
        id: id.to_string(),
        created_at: Utc::now(),
        source: MessageSource { module: "kalshi".to_string(), stream: None },
        message: "hello".to_string(),
        from: None,
        is_direct_mention: false,
        is_digest: false,
        is_system_message: false,
        likes: None,
        tags: None,
        context_ref: None,
        follow_me_panel: None,
        realtime: None,
    }
}

#[test]
fn decodes_envelope_shape() {
    let envelope = MessageCreatedEnvelope::wrap(sample_message("m-1"));
    let payload = serde_json::to_vec(&envelope).unwrap();
    let decoded = decode_message_created(&payload).unwrap();
    assert_eq!(decoded.id, "m-1");
}

#[test]
fn decodes_bare_shape() {
    let payload = serde_json::to_vec(&sample_message("m-2")).unwrap();
    let decoded = decode_message_created(&payload).unwrap();
    assert_eq!(decoded.id, "m-2");
}

#[test]
fn rejects_malformed_payload() {
    assert!(decode_message_created(b"not json").is_err());
}
