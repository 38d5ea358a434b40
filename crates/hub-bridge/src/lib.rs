//! Remote-object bridge between the project hub UI and the editor host.
//!
//! The host publishes named objects (properties, methods, signals). This
//! crate mirrors them on the UI side:
//! - [`transport`]: one JSON message channel to the host (in-memory or WebSocket)
//! - [`channel`]: correlation ids, handshake, inbound demultiplexing
//! - [`proxy`]: cached properties, async method calls, subscriptions
//! - [`registry`]: the per-handshake object table and the process-wide [`Bridge`]
//! - [`backend`]: the typed `backend` object the hub screen consumes
//!
//! No operation here has a built-in timeout except the optional handshake
//! timeout. Wrap `invoke`/`call` in `tokio::time::timeout` where a bound is
//! needed.

pub mod backend;
pub mod channel;
pub mod protocol;
pub mod proxy;
pub mod registry;
pub mod transport;

pub use backend::{BackendProxy, ProjectBackend, BACKEND_OBJECT};
pub use channel::{Channel, ChannelOptions};
pub use hub_common::{BridgeError, BridgeErrorKind, ChannelEvent, ProjectEntry};
pub use protocol::{HostMessage, ObjectDescriptor, UiMessage};
pub use proxy::{ObjectProxy, Subscription};
pub use registry::{Bridge, Registry};
pub use transport::{HostEndpoint, MemoryTransport, Transport, WebSocketTransport};
