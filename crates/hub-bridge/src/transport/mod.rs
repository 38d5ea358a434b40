//! Transports carry JSON values between the UI and the host.
//!
//! Contract shared by every implementation:
//! - `send` queues; messages sent before the connection is up are flushed in
//!   order once it is. After closure `send` fails with `ChannelClosed`.
//! - the inbound stream has exactly one consumer; `take_inbound` hands it out once.
//! - no retries. Failure ends the inbound stream, which the channel treats as
//!   connection closed.

mod memory;
mod websocket;

pub use memory::{HostEndpoint, MemoryTransport};
pub use websocket::WebSocketTransport;

use hub_common::BridgeError;
use serde_json::Value;
use tokio::sync::mpsc;

/// Receiving half of a transport.
pub type Inbound = mpsc::UnboundedReceiver<Value>;

pub trait Transport: Send + Sync + 'static {
    /// Queue one message for the host.
    fn send(&self, message: Value) -> Result<(), BridgeError>;

    /// Hand over the inbound stream. Returns `None` after the first call.
    fn take_inbound(&self) -> Option<Inbound>;

    /// Stop sending. Outbound messages still queued may be dropped.
    fn close(&self);
}
