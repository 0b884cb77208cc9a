//! WebSocket connection handler.
//!
//! Adapts one axum WebSocket into an observer session: admits the
//! observer, drains its outbound queue onto the socket from a dedicated
//! writer task, and removes it from the broadcast set when the connection
//! ends for any reason.

use crate::ws::broadcaster::Broadcaster;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-connection WebSocket handler.
pub struct WebSocketHandler {
    broadcaster: Arc<Broadcaster>,
}

impl WebSocketHandler {
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        Self { broadcaster }
    }

    /// Run the session until the socket closes.
    pub async fn handle(self, socket: WebSocket) {
        let (observer_id, mut outbound) = self.broadcaster.on_connect().await;
        let (mut sink, mut stream) = socket.split();

        // Writer task: the only place observer queues meet the network.
        // The LIST enqueued on connect is necessarily the first frame sent.
        let mut writer = tokio::spawn(async move {
            while let Some(message) = outbound.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(error = %e, "Failed to serialize outbound message");
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        // Observers do not speak; the read loop only notices disconnects
        // and keeps the protocol-level ping/pong flowing.
        loop {
            tokio::select! {
                _ = &mut writer => break,
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(observer = %observer_id, "WebSocket close received");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(observer = %observer_id, error = %e, "WebSocket error");
                        break;
                    }
                },
            }
        }

        writer.abort();
        self.broadcaster.on_disconnect(&observer_id);
        info!(observer = %observer_id, "WebSocket connection closed");
    }
}
