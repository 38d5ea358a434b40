use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection to the editor host that publishes the hub's objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// WebSocket URL of the host's bridge endpoint.
    pub url: String,
    /// Objects to request at handshake. Empty requests everything.
    pub objects: Vec<String>,
    /// Handshake timeout in milliseconds. 0 waits forever.
    pub handshake_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:12345".into(),
            objects: Vec::new(),
            handshake_timeout_ms: 0,
        }
    }
}

impl BridgeConfig {
    pub fn handshake_timeout(&self) -> Option<Duration> {
        (self.handshake_timeout_ms > 0).then(|| Duration::from_millis(self.handshake_timeout_ms))
    }

    /// `None` when every published object should be requested.
    pub fn requested_objects(&self) -> Option<Vec<String>> {
        (!self.objects.is_empty()).then(|| self.objects.clone())
    }
}
