//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;

use super::connection::ConnectionHandler;
use crate::app_state::AppState;

/// Upgrades any request to a relay WebSocket connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let handler = ConnectionHandler::new(peer, Arc::clone(&state.store));

    ws.max_message_size(state.max_message_bytes)
        .on_failed_upgrade(move |err| {
            tracing::warn!(%peer, error = %err, "ws upgrade failed");
        })
        .on_upgrade(move |socket| handler.run(socket))
}
