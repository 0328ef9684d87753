//! Update handlers: create, list, nearby, get, delete, sweep.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateUpdateRequest, FeedItemDto, NearbyParams, NearbyResponse, SweepResponse,
    UpdateListResponse,
};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::app_state::AppState;
use crate::domain::{Update, UpdateId};
use crate::error::{ErrorResponse, PulseError};
use crate::service::now_millis;

/// `POST /updates`: Post a new update.
///
/// # Errors
///
/// Returns [`PulseError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/updates",
    tag = "Updates",
    summary = "Post an update",
    description = "Creates a geo-tagged update. `timestamp` is set to now and `expiresAt` to now plus `expiresInHours` (default 2).",
    request_body = CreateUpdateRequest,
    responses(
        (status = 201, description = "Update created", body = Update),
        (status = 400, description = "Malformed body, unknown category, or invalid description or lifetime", body = ErrorResponse),
        (status = 500, description = "Store write failed", body = ErrorResponse),
    )
)]
pub async fn create_update(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUpdateRequest>,
) -> Result<impl IntoResponse, PulseError> {
    let update = state.update_service.create_update(req.into()).await?;
    Ok((StatusCode::CREATED, Json(update)))
}

/// `GET /updates`: Every active update, no distance filter.
///
/// # Errors
///
/// Returns [`PulseError::PersistenceError`] if the store read fails.
#[utoipa::path(
    get,
    path = "/api/v1/updates",
    tag = "Updates",
    summary = "List active updates",
    description = "Returns every update that has not expired, ordered by expiry and then most recent first.",
    responses(
        (status = 200, description = "Active updates", body = UpdateListResponse),
        (status = 500, description = "Store read failed", body = ErrorResponse),
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PulseError> {
    let data = state.update_service.active_updates(now_millis()).await?;
    Ok(Json(UpdateListResponse {
        count: data.len(),
        data,
    }))
}

/// `GET /updates/nearby`: Active updates around a point.
///
/// # Errors
///
/// Returns [`PulseError`] on a bad radius or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/updates/nearby",
    tag = "Updates",
    summary = "Nearby active updates",
    description = "Fetches active updates from the store, keeps those within `radius_km` of (`lat`, `lng`), and orders them most recent first.",
    params(NearbyParams),
    responses(
        (status = 200, description = "Nearby feed", body = NearbyResponse),
        (status = 400, description = "Missing or malformed query parameters, or invalid radius", body = ErrorResponse),
        (status = 500, description = "Store read failed", body = ErrorResponse),
    )
)]
pub async fn list_nearby(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NearbyParams>,
) -> Result<impl IntoResponse, PulseError> {
    let center = params.center();
    let settings = *state.update_service.feed_settings();
    let radius_km = params.radius_km.unwrap_or(settings.radius_km);
    let boundary = params.boundary.unwrap_or(settings.boundary);

    let updates = state
        .update_service
        .nearby_updates(center, Some(radius_km), Some(boundary), now_millis())
        .await?;

    let data: Vec<FeedItemDto> = updates
        .into_iter()
        .map(|u| FeedItemDto::new(u, &center))
        .collect();

    Ok(Json(NearbyResponse {
        center,
        radius_km,
        boundary,
        count: data.len(),
        data,
    }))
}

/// `GET /updates/{id}`: Fetch one update.
///
/// # Errors
///
/// Returns [`PulseError::UpdateNotFound`] if the update does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/updates/{id}",
    tag = "Updates",
    summary = "Get an update",
    description = "Returns a single update by id, whether or not it has expired.",
    params(
        ("id" = uuid::Uuid, Path, description = "Update UUID"),
    ),
    responses(
        (status = 200, description = "The update", body = Update),
        (status = 404, description = "Update not found", body = ErrorResponse),
    )
)]
pub async fn get_update(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PulseError> {
    let update = state
        .update_service
        .get_update(UpdateId::from_uuid(id))
        .await?;
    Ok(Json(update))
}

/// `DELETE /updates/{id}`: Delete an update.
///
/// # Errors
///
/// Returns [`PulseError::UpdateNotFound`] if the update does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/updates/{id}",
    tag = "Updates",
    summary = "Delete an update",
    description = "Removes an update and emits an UpdateRemoved event.",
    params(
        ("id" = uuid::Uuid, Path, description = "Update UUID"),
    ),
    responses(
        (status = 204, description = "Update deleted"),
        (status = 404, description = "Update not found", body = ErrorResponse),
    )
)]
pub async fn delete_update(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PulseError> {
    state
        .update_service
        .delete_update(UpdateId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /updates/sweep`: Remove expired updates now.
///
/// # Errors
///
/// Returns [`PulseError::PersistenceError`] if the delete fails.
#[utoipa::path(
    post,
    path = "/api/v1/updates/sweep",
    tag = "Updates",
    summary = "Sweep expired updates",
    description = "Deletes every update with `expiresAt <= now` and returns how many were removed.",
    responses(
        (status = 200, description = "Sweep result", body = SweepResponse),
        (status = 500, description = "Store delete failed", body = ErrorResponse),
    )
)]
pub async fn sweep_expired(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PulseError> {
    let cutoff = now_millis();
    let removed = state.update_service.sweep_expired(cutoff).await?;
    Ok(Json(SweepResponse { removed, cutoff }))
}

/// Update routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/updates", post(create_update).get(list_active))
        .route("/updates/nearby", get(list_nearby))
        .route("/updates/sweep", post(sweep_expired))
        .route("/updates/{id}", get(get_update).delete(delete_update))
}
