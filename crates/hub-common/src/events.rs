use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Lifecycle and notification events published by a bridge channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ChannelEvent {
    Connected {
        objects: Vec<String>,
    },
    PropertyChanged {
        object: String,
        property: String,
        value: serde_json::Value,
    },
    Signal {
        object: String,
        signal: String,
        args: Vec<serde_json::Value>,
    },
    Closed,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<ChannelEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChannelEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
