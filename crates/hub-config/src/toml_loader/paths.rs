//! Where the hub keeps `config.toml`, and seeding it on first run.

use std::path::{Path, PathBuf};

use hub_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "project-hub";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/project-hub/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |action: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {action} {}: {e}", target.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("write", path, e))?;

    info!(path = %path.display(), "Wrote default hub config");
    Ok(())
}
