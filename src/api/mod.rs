//! HTTP surface: router composition and the health endpoint.

pub mod system;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete relay router.
///
/// `/health` is served over plain HTTP; every other path falls through to
/// the WebSocket upgrade.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(system::routes())
        .fallback(ws_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
