//! In-process transport: the host end lives in the same process.

use std::sync::Mutex;

use hub_common::BridgeError;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{Inbound, Transport};

/// UI half of an in-process connection.
pub struct MemoryTransport {
    to_host: Mutex<Option<mpsc::UnboundedSender<Value>>>,
    inbound: Mutex<Option<Inbound>>,
}

/// Host half of an in-process connection.
pub struct HostEndpoint {
    from_ui: mpsc::UnboundedReceiver<Value>,
    to_ui: Option<mpsc::UnboundedSender<Value>>,
}

impl MemoryTransport {
    pub fn pair() -> (Self, HostEndpoint) {
        let (to_host, from_ui) = mpsc::unbounded_channel();
        let (to_ui, inbound) = mpsc::unbounded_channel();

        let transport = Self {
            to_host: Mutex::new(Some(to_host)),
            inbound: Mutex::new(Some(inbound)),
        };
        let host = HostEndpoint {
            from_ui,
            to_ui: Some(to_ui),
        };
        (transport, host)
    }
}

impl Transport for MemoryTransport {
    fn send(&self, message: Value) -> Result<(), BridgeError> {
        let guard = self.to_host.lock().map_err(|_| BridgeError::ChannelClosed)?;
        match guard.as_ref() {
            Some(tx) => tx.send(message).map_err(|_| BridgeError::ChannelClosed),
            None => Err(BridgeError::ChannelClosed),
        }
    }

    fn take_inbound(&self) -> Option<Inbound> {
        self.inbound.lock().ok()?.take()
    }

    fn close(&self) {
        if let Ok(mut guard) = self.to_host.lock() {
            guard.take();
        }
    }
}

impl HostEndpoint {
    /// Next message from the UI. `None` once the UI side has closed.
    pub async fn recv(&mut self) -> Option<Value> {
        self.from_ui.recv().await
    }

    /// Deliver a message to the UI.
    pub fn send(&self, message: Value) -> Result<(), BridgeError> {
        match &self.to_ui {
            Some(tx) => tx.send(message).map_err(|_| BridgeError::ChannelClosed),
            None => Err(BridgeError::ChannelClosed),
        }
    }

    /// Drop the connection. The UI sees its inbound stream end.
    pub fn close(&mut self) {
        self.to_ui.take();
    }

    pub fn is_closed(&self) -> bool {
        self.to_ui.as_ref().map_or(true, |tx| tx.is_closed())
    }
}
