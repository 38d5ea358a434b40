//! Project hub configuration.
//!
//! Loads `config.toml` from the platform config directory. Every section
//! uses serde defaults, so a partial file (or none at all) still yields a
//! complete config.
//!
//! ```rust,no_run
//! use hub_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BridgeConfig, HubConfig, LogLevel, LoggingConfig, CONFIG_SCHEMA_VERSION};

use hub_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it when missing.
///
/// A file that fails validation yields the default config (see
/// [`toml_loader::load_from_path`]).
pub fn load_config() -> Result<HubConfig, ConfigError> {
    toml_loader::load_default()
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<HubConfig, ConfigError> {
    toml_loader::load_from_path(path)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &HubConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
