//! Geocoding and AI summary DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Coordinates;

/// Query parameters for `GET /geocode`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeParams {
    /// Free-text place search.
    pub q: String,
}

/// Response body for `GET /geocode`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeocodeResponse {
    /// Query as received.
    pub query: String,
    /// Best match.
    pub location: Coordinates,
}

/// Request body for `POST /summary`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Feed center; falls back to the user location, then the default center.
    #[serde(default)]
    pub center: Option<Coordinates>,
    /// Device location, mentioned in the prompt when known.
    #[serde(default)]
    pub user_location: Option<Coordinates>,
    /// Radius override in km.
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Response body for `POST /summary`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Model output or a fixed fallback sentence.
    pub summary: String,
    /// Number of updates the summary was built from.
    pub update_count: usize,
}
