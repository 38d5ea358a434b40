//! Inbound demultiplexing: one host message at a time, in arrival order.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use hub_common::{BridgeError, ChannelEvent};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::protocol::{
    message_type, HostMessage, ObjectDescriptor, RemoteError, HANDSHAKE_RESPONSE_TYPE,
};
use crate::proxy::ObjectProxy;

use super::{ChannelInner, ObjectMap};

impl ChannelInner {
    pub(super) fn dispatch(self: &Arc<Self>, raw: Value) {
        let is_handshake = message_type(&raw) == Some(HANDSHAKE_RESPONSE_TYPE);

        let message = match HostMessage::from_value(raw) {
            Ok(message) => message,
            Err(e) if is_handshake => {
                let failed = self.finish_handshake(Err(BridgeError::Handshake(format!(
                    "malformed handshake response: {e}"
                ))));
                if !failed {
                    debug!(session = %self.session.short(), error = %e, "Dropping late malformed handshake response");
                }
                return;
            }
            Err(e) => {
                warn!(session = %self.session.short(), error = %e, "Dropping malformed message from host");
                return;
            }
        };

        match message {
            HostMessage::HandshakeResponse { objects } => self.on_handshake(objects),
            HostMessage::Response { id, result, error } => self.on_response(id, result, error),
            HostMessage::PropertyChanged {
                object_name,
                property,
                value,
            } => self.on_property_changed(object_name, property, value),
            HostMessage::Signal {
                object_name,
                signal,
                args,
            } => self.on_signal(object_name, signal, args),
            HostMessage::Unknown => {
                debug!(session = %self.session.short(), "Ignoring message of unknown type");
            }
        }
    }

    fn on_handshake(self: &Arc<Self>, objects: HashMap<String, ObjectDescriptor>) {
        let already_done = self
            .handshake
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none();
        if already_done {
            debug!(session = %self.session.short(), "Ignoring duplicate handshake response");
            return;
        }

        let mut names: Vec<String> = objects.keys().cloned().collect();
        names.sort();

        let channel = Arc::downgrade(self);
        let built: ObjectMap = objects
            .into_iter()
            .map(|(name, descriptor)| {
                let proxy = ObjectProxy::new(name.clone(), descriptor, channel.clone());
                (name, Arc::new(proxy))
            })
            .collect();
        self.proxies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(built.iter().map(|(name, proxy)| (name.clone(), Arc::clone(proxy))));

        info!(session = %self.session.short(), objects = ?names, "Bridge handshake complete");
        self.events.publish(ChannelEvent::Connected { objects: names });
        self.finish_handshake(Ok(built));
    }

    fn on_response(&self, id: u64, result: Option<Value>, error: Option<RemoteError>) {
        let Some(call) = self.lock_pending().take(id) else {
            debug!(session = %self.session.short(), id, "Dropping response with no pending call");
            return;
        };

        let outcome = match error {
            Some(error) => {
                debug!(
                    session = %self.session.short(),
                    id,
                    object = %call.object,
                    method = %call.method,
                    message = %error.message,
                    "Host method failed"
                );
                Err(BridgeError::Invocation {
                    object: call.object,
                    method: call.method,
                    message: error.message,
                })
            }
            None => Ok(result.unwrap_or(Value::Null)),
        };

        // The caller may have dropped its future; nothing to do then.
        let _ = call.reply.send(outcome);
    }

    fn on_property_changed(&self, object: String, property: String, value: Value) {
        let Some(proxy) = self.proxy(&object) else {
            debug!(session = %self.session.short(), object = %object, "Property change for unknown object");
            return;
        };

        if !proxy.apply_property_change(&property, value.clone()) {
            debug!(
                session = %self.session.short(),
                object = %object,
                property = %property,
                "Property change for unknown property"
            );
            return;
        }

        self.events.publish(ChannelEvent::PropertyChanged {
            object,
            property,
            value,
        });
    }

    fn on_signal(&self, object: String, signal: String, args: Vec<Value>) {
        let Some(proxy) = self.proxy(&object) else {
            debug!(session = %self.session.short(), object = %object, "Signal for unknown object");
            return;
        };

        if !proxy.emit_signal(&signal, &args) {
            debug!(
                session = %self.session.short(),
                object = %object,
                signal = %signal,
                "Unknown signal"
            );
            return;
        }

        self.events.publish(ChannelEvent::Signal {
            object,
            signal,
            args,
        });
    }

    fn proxy(&self, name: &str) -> Option<Arc<ObjectProxy>> {
        self.proxies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
