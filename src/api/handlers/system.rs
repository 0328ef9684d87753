//! System endpoints: health check and category catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::Category;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Display metadata for one category.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryInfo {
    category: Category,
    label: &'static str,
    color: &'static str,
}

/// `GET /config/categories`: List update categories.
#[utoipa::path(
    get,
    path = "/config/categories",
    tag = "System",
    summary = "List categories",
    description = "Returns every update category with its display label and marker color.",
    responses(
        (status = 200, description = "Category catalog", body = Vec<CategoryInfo>),
    )
)]
pub async fn categories_handler() -> impl IntoResponse {
    let categories: Vec<CategoryInfo> = Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            category,
            label: category.label(),
            color: category.color(),
        })
        .collect();
    (StatusCode::OK, Json(categories))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/categories", get(categories_handler))
}
