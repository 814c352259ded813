//! Per-connection message handling.
//!
//! A [`ConnectionHandler`] is bound to exactly one WebSocket for its whole
//! lifetime. Frames are processed one at a time: parse, persist, reply.
//! Every data frame produces exactly one [`OutboundFrame`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;

use super::messages::OutboundFrame;
use crate::error::RelayError;
use crate::persistence::{MessageStore, StoredRecord};

/// Handler for a single client connection.
#[derive(Debug)]
pub struct ConnectionHandler {
    peer: SocketAddr,
    store: Arc<dyn MessageStore>,
    frames_handled: u64,
}

impl ConnectionHandler {
    /// Creates a handler for the client at `peer`, writing to `store`.
    #[must_use]
    pub fn new(peer: SocketAddr, store: Arc<dyn MessageStore>) -> Self {
        Self {
            peer,
            store,
            frames_handled: 0,
        }
    }

    /// Runs the read/reply loop until the client closes the connection,
    /// the transport fails, or a reply cannot be delivered.
    pub async fn run(mut self, mut socket: WebSocket) {
        tracing::info!(peer = %self.peer, "client connected");

        while let Some(msg) = socket.recv().await {
            let frame = match msg {
                Ok(Message::Text(text)) => self.handle_text(text.as_str()).await,
                Ok(Message::Binary(bytes)) => self.handle_binary(&bytes).await,
                // Keep reading so the queued close reply is flushed.
                Ok(Message::Close(_)) => continue,
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Err(err) => {
                    tracing::warn!(peer = %self.peer, error = %err, "ws transport error");
                    break;
                }
            };

            if socket.send(Message::text(frame.to_json())).await.is_err() {
                tracing::debug!(peer = %self.peer, "reply dropped, client already gone");
                break;
            }
        }

        self.teardown();
    }

    /// Handles one text frame and returns the reply for it.
    pub async fn handle_text(&mut self, text: &str) -> OutboundFrame {
        self.frames_handled = self.frames_handled.saturating_add(1);

        match self.relay(text).await {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(peer = %self.peer, error = %err, "rejecting message");
                OutboundFrame::error(&err)
            }
        }
    }

    /// Handles one binary frame, which must carry UTF-8 JSON text.
    pub async fn handle_binary(&mut self, bytes: &[u8]) -> OutboundFrame {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.handle_text(text).await,
            Err(_) => {
                self.frames_handled = self.frames_handled.saturating_add(1);
                let err = RelayError::NonUtf8Frame;
                tracing::warn!(peer = %self.peer, error = %err, "rejecting message");
                OutboundFrame::error(&err)
            }
        }
    }

    /// Number of data frames handled so far.
    #[must_use]
    pub const fn frames_handled(&self) -> u64 {
        self.frames_handled
    }

    async fn relay(&self, text: &str) -> Result<OutboundFrame, RelayError> {
        let content: serde_json::Value = serde_json::from_str(text)?;
        tracing::debug!(peer = %self.peer, %content, "received message");

        let received_at = Utc::now();
        let record = StoredRecord::new(content, received_at);
        self.store.insert(&record).await?;

        Ok(OutboundFrame::echo(record.content, received_at))
    }

    fn teardown(self) {
        tracing::info!(
            peer = %self.peer,
            frames = self.frames_handled,
            "client disconnected"
        );
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;
    use serde_json::json;

    fn handler(store: &Arc<InMemoryStore>) -> ConnectionHandler {
        let store: Arc<dyn MessageStore> = Arc::<InMemoryStore>::clone(store);
        ConnectionHandler::new(SocketAddr::from(([127, 0, 0, 1], 40000)), store)
    }

    #[tokio::test]
    async fn valid_json_is_stored_and_echoed() {
        let store = Arc::new(InMemoryStore::new());
        let mut handler = handler(&store);

        let frame = handler.handle_text(r#"{"foo":1}"#).await;
        let OutboundFrame::Echo { content, timestamp } = frame else {
            panic!("expected ECHO");
        };
        assert_eq!(content, json!({"foo": 1}));

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        let Some(record) = records.first() else {
            panic!("record missing");
        };
        assert_eq!(record.content, json!({"foo": 1}));
        assert_eq!(record.created_at, timestamp);
        assert_eq!(handler.frames_handled(), 1);
    }

    #[tokio::test]
    async fn scalar_json_values_are_echoed() {
        let store = Arc::new(InMemoryStore::new());
        let mut handler = handler(&store);

        for (raw, expected) in [("42", json!(42)), ("\"hi\"", json!("hi")), ("null", json!(null))] {
            let frame = handler.handle_text(raw).await;
            let OutboundFrame::Echo { content, .. } = frame else {
                panic!("expected ECHO for {raw}");
            };
            assert_eq!(content, expected);
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_without_persisting() {
        let store = Arc::new(InMemoryStore::new());
        let mut handler = handler(&store);

        for raw in ["not json", r#"{"foo":"#, ""] {
            let frame = handler.handle_text(raw).await;
            assert_eq!(
                frame,
                OutboundFrame::Error {
                    message: "Invalid message format".to_string()
                }
            );
        }
        assert!(store.is_empty().await);
        assert_eq!(handler.frames_handled(), 3);
    }

    #[tokio::test]
    async fn store_outage_is_reported_as_error_frame() {
        let store = Arc::new(InMemoryStore::new());
        store.set_available(false);
        let mut handler = handler(&store);

        let frame = handler.handle_text(r#"{"foo":1}"#).await;
        assert_eq!(
            frame,
            OutboundFrame::Error {
                message: "Failed to store message".to_string()
            }
        );

        store.set_available(true);
        let frame = handler.handle_text(r#"{"foo":2}"#).await;
        assert!(matches!(frame, OutboundFrame::Echo { .. }));
    }

    #[tokio::test]
    async fn binary_frames_are_decoded_as_utf8() {
        let store = Arc::new(InMemoryStore::new());
        let mut handler = handler(&store);

        let frame = handler.handle_binary(br#"{"bin":true}"#).await;
        let OutboundFrame::Echo { content, .. } = frame else {
            panic!("expected ECHO");
        };
        assert_eq!(content, json!({"bin": true}));

        let frame = handler.handle_binary(&[0xff, 0xfe, 0x00]).await;
        assert_eq!(
            frame,
            OutboundFrame::Error {
                message: "Invalid message format".to_string()
            }
        );
        assert_eq!(store.len().await, 1);
        assert_eq!(handler.frames_handled(), 2);
    }
}
