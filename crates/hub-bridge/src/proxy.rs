//! UI-side stand-in for one published host object.
//!
//! Property reads come from a local cache filled at handshake and refreshed
//! by `property-changed` notifications. A read never blocks and may be stale
//! until the next notification arrives. Method calls go through the owning
//! channel and resolve asynchronously.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use hub_common::BridgeError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::channel::{await_reply, ChannelInner};
use crate::protocol::ObjectDescriptor;

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

pub struct ObjectProxy {
    name: String,
    methods: BTreeSet<String>,
    signals: BTreeSet<String>,
    properties: RwLock<HashMap<String, Value>>,
    observers: Mutex<Observers>,
    channel: Weak<ChannelInner>,
}

#[derive(Default)]
struct Observers {
    next_id: u64,
    by_name: HashMap<String, Vec<(u64, Handler)>>,
    detached: bool,
}

/// Handle returned by [`ObjectProxy::subscribe`].
///
/// Dropping it keeps the observer registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct Subscription {
    proxy: Weak<ObjectProxy>,
    name: String,
    id: u64,
}

impl ObjectProxy {
    pub(crate) fn new(name: String, descriptor: ObjectDescriptor, channel: Weak<ChannelInner>) -> Self {
        Self {
            name,
            methods: descriptor.methods,
            signals: descriptor.signals,
            properties: RwLock::new(descriptor.properties),
            observers: Mutex::new(Observers::default()),
            channel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last known value of `property`.
    pub fn get(&self, property: &str) -> Option<Value> {
        self.properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(property)
            .cloned()
    }

    /// Last known value of `property`, decoded. `None` if absent or ill-typed.
    pub fn get_as<T: DeserializeOwned>(&self, property: &str) -> Option<T> {
        let value = self.get(property)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(object = %self.name, property, error = %e, "Property has unexpected type");
                None
            }
        }
    }

    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(String::as_str)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn has_signal(&self, signal: &str) -> bool {
        self.signals.contains(signal)
    }

    /// Invoke `method` on the host object.
    ///
    /// Methods not advertised at handshake fail with `UnknownMethod` without
    /// reaching the host. The request is sent before this returns.
    pub fn call(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send + 'static {
        let started = if !self.methods.contains(method) {
            Err(BridgeError::UnknownMethod {
                object: self.name.clone(),
                method: method.to_string(),
            })
        } else {
            match self.channel.upgrade() {
                Some(channel) => channel.start_call(&self.name, method, args),
                None => Err(BridgeError::ChannelClosed),
            }
        };
        await_reply(started)
    }

    /// Observe a property (handler gets the new value) or a signal (handler
    /// gets the argument array).
    ///
    /// Handlers run on the channel's reader task after the cache is updated,
    /// outside any proxy lock. Names the host never advertised simply never fire.
    pub fn subscribe<F>(self: &Arc<Self>, name: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let mut observers = self.lock_observers();
        let id = observers.next_id;
        observers.next_id += 1;

        if !observers.detached {
            observers
                .by_name
                .entry(name.to_string())
                .or_default()
                .push((id, Arc::new(handler)));
        }

        Subscription {
            proxy: Arc::downgrade(self),
            name: name.to_string(),
            id,
        }
    }

    /// Number of live observers for `name`.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.lock_observers().by_name.get(name).map_or(0, Vec::len)
    }

    /// Store a new value for a known property and notify its observers.
    /// Returns false, changing nothing, for properties not in the cache.
    pub(crate) fn apply_property_change(&self, property: &str, value: Value) -> bool {
        {
            let mut properties = self.properties.write().unwrap_or_else(PoisonError::into_inner);
            match properties.get_mut(property) {
                Some(slot) => *slot = value.clone(),
                None => return false,
            }
        }
        self.notify(property, &value);
        true
    }

    /// Notify observers of an advertised signal. Returns false otherwise.
    pub(crate) fn emit_signal(&self, signal: &str, args: &[Value]) -> bool {
        if !self.signals.contains(signal) {
            return false;
        }
        self.notify(signal, &Value::Array(args.to_vec()));
        true
    }

    /// Drop every observer; later subscriptions are inert.
    pub(crate) fn detach(&self) {
        let mut observers = self.lock_observers();
        observers.detached = true;
        observers.by_name.clear();
    }

    fn notify(&self, name: &str, value: &Value) {
        let handlers: Vec<Handler> = self
            .lock_observers()
            .by_name
            .get(name)
            .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(value);
        }
    }

    fn remove_observer(&self, name: &str, id: u64) {
        let mut observers = self.lock_observers();
        if let Some(entries) = observers.by_name.get_mut(name) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                observers.by_name.remove(name);
            }
        }
    }

    fn lock_observers(&self) -> MutexGuard<'_, Observers> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ObjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectProxy")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// The property or signal name this subscription observes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unsubscribe(self) {
        if let Some(proxy) = self.proxy.upgrade() {
            proxy.remove_observer(&self.name, self.id);
        }
    }
}
