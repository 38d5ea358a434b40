//! Session layer over a [`Transport`].
//!
//! A `Channel` owns the transport, the proxies built at handshake, and the
//! table of pending calls. One background task reads the inbound stream in
//! order and dispatches every message, so cache updates, notifications, and
//! responses are applied in the order the host sent them.

mod dispatch;
mod pending;


use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use hub_common::{BridgeError, ChannelEvent, EventBus, SessionId};
use serde_json::Value;
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{debug, info, warn};

use crate::protocol::UiMessage;
use crate::proxy::ObjectProxy;
use crate::registry::Registry;
use crate::transport::{Inbound, Transport};

use pending::{CallResult, PendingCalls};

/// Default capacity of the channel's event bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Handshake parameters.
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Objects to request. `None` asks for every published object.
    pub objects: Option<Vec<String>>,
    /// Give up on the handshake after this long. `None` waits forever.
    pub handshake_timeout: Option<Duration>,
    /// Capacity of the [`ChannelEvent`] bus. Slow subscribers lag past this.
    pub event_capacity: usize,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            objects: None,
            handshake_timeout: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Cheap, cloneable handle to one bridge session.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<ChannelInner>,
}

/// Proxies built from one handshake response, keyed by object name.
pub(crate) type ObjectMap = HashMap<String, Arc<ObjectProxy>>;

pub(crate) struct ChannelInner {
    session: SessionId,
    transport: Box<dyn Transport>,
    pending: Mutex<PendingCalls>,
    proxies: RwLock<ObjectMap>,
    handshake: Mutex<Option<oneshot::Sender<Result<ObjectMap, BridgeError>>>>,
    events: EventBus,
    closed: watch::Sender<bool>,
}

impl Channel {
    /// Perform the handshake over `transport` and build the object registry.
    ///
    /// Resolves once the host's handshake response has arrived and every
    /// advertised object has a proxy. Fails with `Handshake` on a malformed
    /// response or timeout, and with `ChannelClosed` if the transport ends
    /// first.
    pub async fn connect<T: Transport>(
        transport: T,
        options: ChannelOptions,
    ) -> Result<Registry, BridgeError> {
        let inbound = transport.take_inbound().ok_or_else(|| {
            BridgeError::Handshake("transport inbound stream already taken".into())
        })?;

        let (handshake_tx, handshake_rx) = oneshot::channel();
        let (closed, _) = watch::channel(false);
        let inner = Arc::new(ChannelInner {
            session: SessionId::new(),
            transport: Box::new(transport),
            pending: Mutex::new(PendingCalls::new()),
            proxies: RwLock::new(HashMap::new()),
            handshake: Mutex::new(Some(handshake_tx)),
            events: EventBus::new(options.event_capacity.max(1)),
            closed,
        });
        let channel = Channel {
            inner: Arc::clone(&inner),
        };

        tokio::spawn(read_loop(Arc::clone(&inner), inbound));

        info!(
            session = %inner.session.short(),
            objects = ?options.objects,
            "Starting bridge handshake"
        );
        if let Err(e) = inner.send(&UiMessage::handshake(options.objects)) {
            channel.close();
            return Err(e);
        }

        let outcome = match options.handshake_timeout {
            Some(limit) => match tokio::time::timeout(limit, handshake_rx).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(session = %inner.session.short(), ?limit, "Bridge handshake timed out");
                    channel.close();
                    return Err(BridgeError::Handshake(format!(
                        "no handshake response within {limit:?}"
                    )));
                }
            },
            None => handshake_rx.await,
        };

        // Take the proxies from the outcome, not from `inner.proxies`:
        // shutdown may already have drained that.
        let objects = match outcome {
            Ok(Ok(objects)) => objects,
            Ok(Err(e)) => {
                channel.close();
                return Err(e);
            }
            Err(_) => return Err(BridgeError::ChannelClosed),
        };
        Ok(Registry::new(channel, objects))
    }

    /// Call `method` on the host object `object`.
    ///
    /// The invoke message is sent before this returns; the future only waits
    /// for the matching response. There is no timeout.
    pub fn invoke(
        &self,
        object: &str,
        method: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send + 'static {
        let started = self.inner.start_call(object, method, args);
        await_reply(started)
    }

    /// Tear the channel down from the UI side.
    ///
    /// Pending calls are rejected with `ChannelClosed`, proxies are detached,
    /// and every later call fails immediately.
    pub fn close(&self) {
        self.inner.shutdown();
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.closed.borrow()
    }

    /// Resolves once the channel has shut down, for whatever reason.
    pub async fn closed(&self) {
        let mut rx = self.inner.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }

    pub fn events(&self) -> broadcast::Receiver<ChannelEvent> {
        self.inner.events.subscribe()
    }

    pub fn session(&self) -> &SessionId {
        &self.inner.session
    }

    /// Number of calls still waiting for a response.
    pub fn pending_calls(&self) -> usize {
        self.inner.lock_pending().len()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("session", &self.inner.session)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Shared tail of `Channel::invoke` and `ObjectProxy::call`.
pub(crate) fn await_reply(
    started: Result<oneshot::Receiver<CallResult>, BridgeError>,
) -> impl Future<Output = Result<Value, BridgeError>> + Send + 'static {
    async move {
        let reply = started?;
        reply.await.unwrap_or(Err(BridgeError::ChannelClosed))
    }
}

impl ChannelInner {
    /// Register a pending call and send its invoke message.
    pub(crate) fn start_call(
        &self,
        object: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<oneshot::Receiver<CallResult>, BridgeError> {
        let (id, reply) = self.lock_pending().register(object, method)?;

        if let Err(e) = self.send(&UiMessage::invoke(id, object, method, args)) {
            self.lock_pending().take(id);
            return Err(e);
        }

        debug!(
            session = %self.session.short(),
            id,
            object,
            method,
            "Invoked host method"
        );
        Ok(reply)
    }

    fn send(&self, message: &UiMessage) -> Result<(), BridgeError> {
        self.transport.send(message.to_value()?)
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingCalls> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve an outstanding handshake with `outcome`. Returns false when no
    /// handshake was waiting.
    fn finish_handshake(&self, outcome: Result<ObjectMap, BridgeError>) -> bool {
        let waiting = self
            .handshake
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match waiting {
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    fn shutdown(&self) {
        let abandoned = {
            let mut pending = self.lock_pending();
            if pending.is_closed() {
                return;
            }
            pending.close()
        };

        self.transport.close();
        self.finish_handshake(Err(BridgeError::ChannelClosed));

        let rejected = abandoned.len();
        for call in abandoned {
            let _ = call.reply.send(Err(BridgeError::ChannelClosed));
        }

        let proxies: Vec<Arc<ObjectProxy>> = self
            .proxies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, proxy)| proxy)
            .collect();
        for proxy in proxies {
            proxy.detach();
        }

        self.closed.send_replace(true);
        self.events.publish(ChannelEvent::Closed);
        info!(session = %self.session.short(), rejected, "Bridge channel closed");
    }
}

/// Drain the inbound stream until the host hangs up or the UI closes.
async fn read_loop(inner: Arc<ChannelInner>, mut inbound: Inbound) {
    let mut closed = inner.closed.subscribe();

    loop {
        tokio::select! {
            message = inbound.recv() => match message {
                Some(raw) => inner.dispatch(raw),
                None => break,
            },
            _ = closed.wait_for(|closed| *closed) => break,
        }
    }

    debug!(session = %inner.session.short(), "Bridge reader stopped");
    inner.shutdown();
}
