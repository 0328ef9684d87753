//! # citypulse
//!
//! REST API and WebSocket service for a location-based feed of short-lived,
//! geo-tagged city updates.
//!
//! Users post updates (traffic, crowding, hazards, events, neighborhood
//! news) pinned to a coordinate. Each update expires a few hours after it
//! is posted. Readers see the active updates within a radius of a center
//! point, most recent first, and can ask for a short AI summary of what is
//! going on around them.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Feed sessions (ws/)
//!     │
//!     ├── UpdateService, SummaryService, sweeper (service/)
//!     ├── EventBus, feed pipeline, Haversine (domain/)
//!     │
//!     ├── Geocoder, Summarizer (clients/)
//!     │
//!     └── UpdateStore: in-memory or PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the full HTTP application: REST routes, `/ws`, optional Swagger UI
/// and the tower middleware stack.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}
