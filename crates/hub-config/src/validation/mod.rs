//! Configuration validation.
//!
//! Each check pushes a message; all of them are joined into a single
//! `ConfigError::ValidationError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::HubConfig;
use hub_common::ConfigError;
use helpers::validate_range_u64;

/// Longest handshake timeout accepted, in milliseconds.
pub const MAX_HANDSHAKE_TIMEOUT_MS: u64 = 600_000;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HubConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_bridge(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_bridge(errors: &mut Vec<String>, config: &HubConfig) {
    let bridge = &config.bridge;

    if !(bridge.url.starts_with("ws://") || bridge.url.starts_with("wss://")) {
        errors.push(format!(
            "bridge.url = {:?} must start with ws:// or wss://",
            bridge.url
        ));
    }

    validate_range_u64(
        errors,
        "bridge.handshake_timeout_ms",
        bridge.handshake_timeout_ms,
        0,
        MAX_HANDSHAKE_TIMEOUT_MS,
    );

    let mut seen = std::collections::HashSet::new();
    for name in &bridge.objects {
        if name.trim().is_empty() {
            errors.push("bridge.objects contains an empty name".into());
        } else if !seen.insert(name.as_str()) {
            errors.push(format!("bridge.objects lists {name:?} more than once"));
        }
    }
}
