//! Table of in-flight calls, keyed by correlation id.

use std::collections::HashMap;

use hub_common::BridgeError;
use serde_json::Value;
use tokio::sync::oneshot;

pub(crate) type CallResult = Result<Value, BridgeError>;

pub(crate) struct PendingCall {
    pub object: String,
    pub method: String,
    pub reply: oneshot::Sender<CallResult>,
}

/// Correlation ids come from a counter that only moves forward, so an id is
/// never reused while the table lives. The `closed` flag shares the lock with
/// the table: a call is either registered before shutdown (and rejected by
/// it) or refused outright.
pub(crate) struct PendingCalls {
    next_id: u64,
    calls: HashMap<u64, PendingCall>,
    closed: bool,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            calls: HashMap::new(),
            closed: false,
        }
    }

    /// Allocate an id and record the call.
    pub fn register(
        &mut self,
        object: &str,
        method: &str,
    ) -> Result<(u64, oneshot::Receiver<CallResult>), BridgeError> {
        if self.closed {
            return Err(BridgeError::ChannelClosed);
        }

        let id = self.next_id;
        self.next_id += 1;

        let (reply, rx) = oneshot::channel();
        self.calls.insert(
            id,
            PendingCall {
                object: object.to_string(),
                method: method.to_string(),
                reply,
            },
        );
        Ok((id, rx))
    }

    /// Remove the call with this id, if it is still waiting.
    pub fn take(&mut self, id: u64) -> Option<PendingCall> {
        self.calls.remove(&id)
    }

    /// Mark closed and hand back everything still waiting.
    pub fn close(&mut self) -> Vec<PendingCall> {
        self.closed = true;
        self.calls.drain().map(|(_, call)| call).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }
}
