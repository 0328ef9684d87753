//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    CreateUpdateRequest, FeedItemDto, GeocodeResponse, NearbyResponse, SummaryRequest,
    SummaryResponse, SweepResponse, UpdateListResponse,
};
use crate::api::handlers::{pulse, system, updates};
use crate::domain::{Category, Coordinates, RadiusBoundary, Update, UpdateId};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI 3 document, served at `/api-docs/openapi.json` when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "CityPulse",
        description = "Location-based feed of short-lived, geo-tagged city updates."
    ),
    paths(
        system::health_handler,
        system::categories_handler,
        updates::create_update,
        updates::list_active,
        updates::list_nearby,
        updates::get_update,
        updates::delete_update,
        updates::sweep_expired,
        pulse::geocode,
        pulse::summarize,
    ),
    components(schemas(
        Category,
        Coordinates,
        RadiusBoundary,
        Update,
        UpdateId,
        CreateUpdateRequest,
        FeedItemDto,
        NearbyResponse,
        UpdateListResponse,
        SweepResponse,
        GeocodeResponse,
        SummaryRequest,
        SummaryResponse,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
        system::CategoryInfo,
    )),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Updates", description = "Post, list and expire updates"),
        (name = "Search", description = "Place search and AI pulse check"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/config/categories",
            "/api/v1/updates",
            "/api/v1/updates/nearby",
            "/api/v1/updates/{id}",
            "/api/v1/updates/sweep",
            "/api/v1/geocode",
            "/api/v1/summary",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
