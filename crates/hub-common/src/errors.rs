use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Errors surfaced by the bridge core.
///
/// Every failed invocation, handshake, or lookup reaches the caller as one of
/// these. Stale inbound traffic never produces an error.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The handshake response was malformed, or never arrived in time.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The transport is gone. Pending calls are rejected with this, and so is
    /// every call made afterwards.
    #[error("channel closed")]
    ChannelClosed,

    /// The host answered a call with an `error` field.
    #[error("{object}.{method} failed: {message}")]
    Invocation {
        object: String,
        method: String,
        message: String,
    },

    /// `lookup` was called before the bridge finished initializing.
    #[error("bridge not ready")]
    NotReady,

    /// The method was not advertised for this object at handshake time.
    #[error("unknown method {object}.{method}")]
    UnknownMethod { object: String, method: String },

    #[error("object not published by host: {0}")]
    ObjectNotFound(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Field-less discriminant of [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeErrorKind {
    Handshake,
    ChannelClosed,
    Invocation,
    NotReady,
    UnknownMethod,
    ObjectNotFound,
    Json,
}

impl BridgeError {
    pub fn kind(&self) -> BridgeErrorKind {
        match self {
            Self::Handshake(_) => BridgeErrorKind::Handshake,
            Self::ChannelClosed => BridgeErrorKind::ChannelClosed,
            Self::Invocation { .. } => BridgeErrorKind::Invocation,
            Self::NotReady => BridgeErrorKind::NotReady,
            Self::UnknownMethod { .. } => BridgeErrorKind::UnknownMethod,
            Self::ObjectNotFound(_) => BridgeErrorKind::ObjectNotFound,
            Self::Json(_) => BridgeErrorKind::Json,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ChannelClosed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("bridge.url must use ws://".into());
        assert_eq!(
            err.to_string(),
            "config validation error: bridge.url must use ws://"
        );
    }

    #[test]
    fn bridge_error_display() {
        assert_eq!(BridgeError::ChannelClosed.to_string(), "channel closed");
        assert_eq!(BridgeError::NotReady.to_string(), "bridge not ready");

        let err = BridgeError::Handshake("timed out".into());
        assert_eq!(err.to_string(), "handshake failed: timed out");

        let err = BridgeError::Invocation {
            object: "backend".into(),
            method: "CreateProject".into(),
            message: "directory not empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "backend.CreateProject failed: directory not empty"
        );

        let err = BridgeError::UnknownMethod {
            object: "backend".into(),
            method: "OpenProject".into(),
        };
        assert_eq!(err.to_string(), "unknown method backend.OpenProject");
    }

    #[test]
    fn bridge_error_kinds() {
        assert_eq!(
            BridgeError::ChannelClosed.kind(),
            BridgeErrorKind::ChannelClosed
        );
        assert_eq!(BridgeError::NotReady.kind(), BridgeErrorKind::NotReady);
        assert_eq!(
            BridgeError::Handshake(String::new()).kind(),
            BridgeErrorKind::Handshake
        );
        assert_eq!(
            BridgeError::ObjectNotFound("backend".into()).kind(),
            BridgeErrorKind::ObjectNotFound
        );
        assert!(BridgeError::ChannelClosed.is_closed());
        assert!(!BridgeError::NotReady.is_closed());
    }

    #[test]
    fn bridge_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BridgeError = json_err.into();
        assert_eq!(err.kind(), BridgeErrorKind::Json);
    }

    #[test]
    fn hub_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let hub_err: HubError = config_err.into();
        assert!(matches!(hub_err, HubError::Config(_)));
        assert!(hub_err.to_string().contains("bad toml"));
    }

    #[test]
    fn hub_error_from_bridge() {
        let hub_err: HubError = BridgeError::ChannelClosed.into();
        assert!(matches!(hub_err, HubError::Bridge(BridgeError::ChannelClosed)));
        assert_eq!(hub_err.to_string(), "channel closed");
    }

    #[test]
    fn hub_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let hub_err: HubError = io_err.into();
        assert!(matches!(hub_err, HubError::Io(_)));
        assert!(hub_err.to_string().contains("file missing"));
    }
}
