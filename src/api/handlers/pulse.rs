//! Place search and AI pulse-check handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{GeocodeParams, GeocodeResponse, SummaryRequest, SummaryResponse};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, PulseError};
use crate::service::now_millis;

/// `GET /geocode`: Resolve a place name to coordinates.
///
/// # Errors
///
/// Returns [`PulseError::GeoLookupError`] if nothing matches or the lookup
/// service fails.
#[utoipa::path(
    get,
    path = "/api/v1/geocode",
    tag = "Search",
    summary = "Geocode a place",
    description = "Looks up a free-text place name and returns the best match.",
    params(GeocodeParams),
    responses(
        (status = 200, description = "Best match", body = GeocodeResponse),
        (status = 400, description = "Blank or missing query", body = ErrorResponse),
        (status = 404, description = "No match or lookup failure", body = ErrorResponse),
    )
)]
pub async fn geocode(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GeocodeParams>,
) -> Result<impl IntoResponse, PulseError> {
    let location = state.geocoder.search(&params.q).await.inspect_err(|e| {
        tracing::warn!(query = %params.q, error = %e, "geocoding failed");
    })?;
    Ok(Json(GeocodeResponse {
        query: params.q,
        location,
    }))
}

/// `POST /summary`: AI pulse check for the feed around a point.
///
/// # Errors
///
/// Returns [`PulseError`] only if reading nearby updates fails; summary
/// problems degrade to a fallback sentence.
#[utoipa::path(
    post,
    path = "/api/v1/summary",
    tag = "Search",
    summary = "City pulse summary",
    description = "Summarizes the nearby feed in two or three sentences. Always answers 200 with either model output or a fixed fallback sentence.",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary text", body = SummaryResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Store read failed", body = ErrorResponse),
    )
)]
pub async fn summarize(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SummaryRequest>,
) -> Result<impl IntoResponse, PulseError> {
    let now = now_millis();
    let center = req
        .center
        .or(req.user_location)
        .unwrap_or(state.view_defaults.center);

    let updates = state
        .update_service
        .nearby_updates(center, req.radius_km, None, now)
        .await?;
    let summary = state
        .summary_service
        .pulse_check(&updates, req.user_location, now)
        .await;

    Ok(Json(SummaryResponse {
        summary,
        update_count: updates.len(),
    }))
}

/// Search and summary routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(geocode))
        .route("/summary", post(summarize))
}
