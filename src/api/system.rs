//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::RelayError;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
///
/// # Errors
///
/// Returns a [`RelayError::PersistenceError`] (HTTP 503) when the message
/// store does not answer a ping.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RelayError> {
    state.store.ping().await?;

    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    ))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
