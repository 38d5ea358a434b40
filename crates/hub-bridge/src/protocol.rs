//! Wire messages exchanged with the host.
//!
//! Every message is a JSON object tagged by `type`:
//! - **UI -> host**: `handshake`, `invoke`
//! - **host -> UI**: `handshake-response`, `response`, `property-changed`, `signal`

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the UI sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiMessage {
    #[serde(rename = "handshake")]
    Handshake {
        /// `None` requests every published object.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        objects: Option<Vec<String>>,
    },
    #[serde(rename = "invoke")]
    Invoke {
        id: u64,
        #[serde(rename = "objectName")]
        object_name: String,
        #[serde(rename = "methodName")]
        method_name: String,
        args: Vec<Value>,
    },
}

/// Messages the host sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "handshake-response")]
    HandshakeResponse {
        objects: HashMap<String, ObjectDescriptor>,
    },
    #[serde(rename = "response")]
    Response {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<RemoteError>,
    },
    #[serde(rename = "property-changed")]
    PropertyChanged {
        #[serde(rename = "objectName")]
        object_name: String,
        property: String,
        value: Value,
    },
    #[serde(rename = "signal")]
    Signal {
        #[serde(rename = "objectName")]
        object_name: String,
        signal: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    /// A message type newer than this client. Ignored.
    #[serde(other)]
    Unknown,
}

/// Shape of one published object, as advertised at handshake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDescriptor {
    pub properties: HashMap<String, Value>,
    pub methods: BTreeSet<String>,
    pub signals: BTreeSet<String>,
}

/// The `error` member of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    pub message: String,
}

pub const HANDSHAKE_RESPONSE_TYPE: &str = "handshake-response";

impl UiMessage {
    pub fn handshake(objects: Option<Vec<String>>) -> Self {
        Self::Handshake { objects }
    }

    pub fn invoke(
        id: u64,
        object_name: impl Into<String>,
        method_name: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self::Invoke {
            id,
            object_name: object_name.into(),
            method_name: method_name.into(),
            args,
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl HostMessage {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// The `type` tag of a raw message, if it has one.
pub fn message_type(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}
