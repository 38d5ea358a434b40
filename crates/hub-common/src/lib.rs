pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{BridgeError, BridgeErrorKind, ConfigError, HubError};
pub use events::{ChannelEvent, EventBus};
pub use id::SessionId;
pub use types::ProjectEntry;

pub type Result<T> = std::result::Result<T, HubError>;
