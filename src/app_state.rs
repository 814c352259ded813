//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::DEFAULT_MAX_MESSAGE_BYTES;
use crate::persistence::MessageStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Message store shared by every connection.
    pub store: Arc<dyn MessageStore>,
    /// Largest inbound WebSocket message accepted, in bytes.
    pub max_message_bytes: usize,
}

impl AppState {
    /// Creates state around `store` with the default message size limit.
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}
