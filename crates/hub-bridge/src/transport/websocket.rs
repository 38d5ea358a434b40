//! WebSocket transport: one JSON document per text frame.

use std::sync::Mutex;

use futures_util::{SinkExt, StreamExt};
use hub_common::BridgeError;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use super::{Inbound, Transport};

/// Transport over a WebSocket connection to the editor host.
///
/// The socket is opened by a background task. Messages sent while it is
/// still connecting wait in the outbound queue.
pub struct WebSocketTransport {
    url: String,
    outbound: Mutex<Option<mpsc::UnboundedSender<Value>>>,
    inbound: Mutex<Option<Inbound>>,
}

impl WebSocketTransport {
    /// Start connecting to `url`. Must be called from within a tokio runtime.
    pub fn open(url: impl Into<String>) -> Self {
        let url = url.into();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(connection_task(url.clone(), outbound_rx, inbound_tx));

        Self {
            url,
            outbound: Mutex::new(Some(outbound_tx)),
            inbound: Mutex::new(Some(inbound_rx)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for WebSocketTransport {
    fn send(&self, message: Value) -> Result<(), BridgeError> {
        let guard = self.outbound.lock().map_err(|_| BridgeError::ChannelClosed)?;
        match guard.as_ref() {
            Some(tx) => tx.send(message).map_err(|_| BridgeError::ChannelClosed),
            None => Err(BridgeError::ChannelClosed),
        }
    }

    fn take_inbound(&self) -> Option<Inbound> {
        self.inbound.lock().ok()?.take()
    }

    fn close(&self) {
        if let Ok(mut guard) = self.outbound.lock() {
            guard.take();
        }
    }
}

/// Owns the socket. Returning drops `inbound`, which ends the UI's stream.
async fn connection_task(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Value>,
    inbound: mpsc::UnboundedSender<Value>,
) {
    info!(url = %url, "Connecting to host bridge");

    let ws = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _)) => ws,
        Err(e) => {
            warn!(url = %url, error = %e, "Host bridge connection failed");
            return;
        }
    };
    info!(url = %url, "Host bridge connected");

    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            message = outbound.recv() => {
                let Some(value) = message else {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                };
                if let Err(e) = sink.send(WsMessage::Text(value.to_string().into())).await {
                    warn!(error = %e, "Host bridge write failed");
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<Value>(&text) {
                            Ok(value) => {
                                if inbound.send(value).is_err() {
                                    break;
                                }
                            }
                            Err(_) => {
                                warn!(len = text.len(), "Dropping non-JSON frame from host");
                            }
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sink.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Host bridge read failed");
                        break;
                    }
                }
            }
        }
    }

    debug!(url = %url, "Host bridge connection closed");
}
