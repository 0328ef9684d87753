//! Update DTOs for create, list, nearby, and sweep endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Category, Coordinates, EpochMillis, RadiusBoundary, Update, format_distance,
};
use crate::service::CreateUpdate;

/// Request body for `POST /updates`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateRequest {
    /// Kind of update.
    pub category: Category,
    /// Free text, at most 140 characters.
    pub description: String,
    /// Where the update happened.
    pub location: Coordinates,
    /// Posting user, if signed in.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Lifetime in hours (default 2).
    #[serde(default)]
    pub expires_in_hours: Option<f64>,
}

impl From<CreateUpdateRequest> for CreateUpdate {
    fn from(req: CreateUpdateRequest) -> Self {
        Self {
            category: req.category,
            description: req.description,
            location: req.location,
            author_id: req.author_id,
            lifetime_hours: req.expires_in_hours,
        }
    }
}

/// Query parameters for `GET /updates/nearby`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyParams {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Search radius in km (default from configuration).
    #[serde(default)]
    pub radius_km: Option<f64>,
    /// `inclusive` or `exclusive` (default from configuration).
    #[serde(default)]
    pub boundary: Option<RadiusBoundary>,
}

impl NearbyParams {
    /// Center as coordinates.
    #[must_use]
    pub const fn center(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// An update annotated with its distance from the query center.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemDto {
    /// The update itself.
    #[serde(flatten)]
    pub update: Update,
    /// Distance from the center in km.
    pub distance_km: f64,
    /// Display label such as `"140m away"`.
    pub distance_label: String,
}

impl FeedItemDto {
    /// Annotates `update` with its distance from `center`.
    #[must_use]
    pub fn new(update: Update, center: &Coordinates) -> Self {
        let distance_km = center.distance_km(&update.location);
        Self {
            update,
            distance_km,
            distance_label: format_distance(distance_km),
        }
    }
}

/// Response body for `GET /updates/nearby`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    /// Query center.
    pub center: Coordinates,
    /// Radius applied, in km.
    pub radius_km: f64,
    /// Boundary rule applied.
    pub boundary: RadiusBoundary,
    /// Number of items.
    pub count: usize,
    /// Active updates inside the radius, most recent first.
    pub data: Vec<FeedItemDto>,
}

/// Response body for `GET /updates`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateListResponse {
    /// Number of items.
    pub count: usize,
    /// Active updates ordered by expiry, then most recent first.
    pub data: Vec<Update>,
}

/// Response body for `POST /updates/sweep`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepResponse {
    /// Rows removed.
    pub removed: u64,
    /// Evaluation time; rows with `expiresAt <= cutoff` were removed.
    pub cutoff: EpochMillis,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UpdateId;

    #[test]
    fn create_request_accepts_minimal_body() {
        let Ok(req) = serde_json::from_str::<CreateUpdateRequest>(
            r#"{"category":"CROWD","description":"Long line","location":{"lat":1.0,"lng":2.0}}"#,
        ) else {
            panic!("minimal body should parse");
        };
        let create = CreateUpdate::from(req);
        assert_eq!(create.category, Category::Crowd);
        assert!(create.author_id.is_none());
        assert!(create.lifetime_hours.is_none());
    }

    #[test]
    fn create_request_rejects_unknown_category() {
        let parsed = serde_json::from_str::<CreateUpdateRequest>(
            r#"{"category":"WEATHER","description":"Rain","location":{"lat":1.0,"lng":2.0}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn feed_item_flattens_update_fields() {
        let update = Update {
            id: UpdateId::new(),
            category: Category::Event,
            description: "Market".to_string(),
            location: Coordinates::new(40.7138, -74.0050),
            timestamp: 1,
            expires_at: 2,
            likes: 45,
            author_id: None,
        };
        let item = FeedItemDto::new(update, &Coordinates::new(40.7128, -74.0060));
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(json["likes"], 45);
        assert_eq!(json["expiresAt"], 2);
        assert_eq!(json["distanceLabel"], "140m away");
    }
}
