//! Tests for the validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&HubConfig::default()).is_ok());
}

#[test]
fn accepts_secure_websocket_url() {
    let mut config = HubConfig::default();
    config.bridge.url = "wss://editor.local:9000/bridge".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_websocket_url() {
    let mut config = HubConfig::default();
    config.bridge.url = "https://editor.local".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.url"));
}

#[test]
fn catches_timeout_too_large() {
    let mut config = HubConfig::default();
    config.bridge.handshake_timeout_ms = MAX_HANDSHAKE_TIMEOUT_MS + 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.handshake_timeout_ms"));
}

#[test]
fn catches_empty_object_name() {
    let mut config = HubConfig::default();
    config.bridge.objects = vec!["backend".into(), "  ".into()];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("empty name"));
}

#[test]
fn catches_duplicate_object_names() {
    let mut config = HubConfig::default();
    config.bridge.objects = vec!["backend".into(), "backend".into()];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("more than once"));
}

#[test]
fn collects_every_error() {
    let mut config = HubConfig::default();
    config.bridge.url = "tcp://host".into();
    config.bridge.handshake_timeout_ms = u64::MAX;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("bridge.url"));
    assert!(err.contains("bridge.handshake_timeout_ms"));
    assert_eq!(err.matches("; ").count(), 1);
}
