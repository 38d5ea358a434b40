//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work.

mod bridge;
mod logging;

pub use bridge::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the project hub.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}
