//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::{SessionContext, run_connection};
use super::session::FeedSession;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to a live feed session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let session = FeedSession::new(
        state.view_defaults,
        *state.update_service.feed_settings(),
    );
    let ctx = SessionContext {
        update_service: Arc::clone(&state.update_service),
        geocoder: Arc::clone(&state.geocoder),
    };

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, ctx, session))
}
