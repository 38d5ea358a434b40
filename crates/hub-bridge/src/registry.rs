//! Object tables: the per-handshake [`Registry`] and the process-wide [`Bridge`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use hub_common::BridgeError;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::channel::Channel;
use crate::proxy::ObjectProxy;

/// Name → proxy table produced by one channel handshake.
///
/// Cloning is cheap and every clone hands out the same proxy instances.
#[derive(Clone, Debug)]
pub struct Registry {
    channel: Channel,
    objects: Arc<HashMap<String, Arc<ObjectProxy>>>,
}

impl Registry {
    pub(crate) fn new(channel: Channel, objects: HashMap<String, Arc<ObjectProxy>>) -> Self {
        Self {
            channel,
            objects: Arc::new(objects),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<ObjectProxy>> {
        self.objects.get(name).cloned()
    }

    /// Names of every object the host advertised, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }
}

static GLOBAL_BRIDGE: Bridge = Bridge::new();

/// Process-wide bridge lifecycle: uninitialized until [`initialize`]
/// succeeds, ready afterwards.
///
/// [`initialize`]: Bridge::initialize
pub struct Bridge {
    registry: OnceCell<Registry>,
}

impl Bridge {
    /// An isolated, uninitialized bridge. UI code normally uses [`Bridge::global`].
    pub const fn new() -> Self {
        Self {
            registry: OnceCell::const_new(),
        }
    }

    pub fn global() -> &'static Bridge {
        &GLOBAL_BRIDGE
    }

    /// Run `connect` once and keep the registry it yields.
    ///
    /// Later and concurrent calls do not run their `connect`; they wait for
    /// the first one and get the same registry. If the first attempt fails
    /// the bridge stays uninitialized and the next call tries again.
    pub async fn initialize<F, Fut>(&self, connect: F) -> Result<&Registry, BridgeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Registry, BridgeError>>,
    {
        if let Some(registry) = self.registry.get() {
            debug!("Bridge already initialized");
            return Ok(registry);
        }

        let registry = self.registry.get_or_try_init(connect).await?;
        info!(objects = ?registry.names(), "Bridge ready");
        Ok(registry)
    }

    pub fn is_ready(&self) -> bool {
        self.registry.initialized()
    }

    pub fn registry(&self) -> Result<&Registry, BridgeError> {
        self.registry.get().ok_or(BridgeError::NotReady)
    }

    /// Proxy for `name`. Fails with `NotReady` before initialization;
    /// `Ok(None)` when the host did not publish `name`.
    pub fn lookup(&self, name: &str) -> Result<Option<Arc<ObjectProxy>>, BridgeError> {
        Ok(self.registry()?.lookup(name))
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}
