//! Place search: free text in, coordinates out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::Coordinates;
use crate::error::PulseError;

/// Text-to-coordinate lookup.
#[async_trait]
pub trait Geocoder: Send + Sync + std::fmt::Debug {
    /// Resolves `query` to the best matching location.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::GeoLookupError`] if nothing matches or the
    /// lookup service fails, and [`PulseError::InvalidRequest`] for a blank
    /// query.
    async fn search(&self, query: &str) -> Result<Coordinates, PulseError>;
}

/// One hit from the Nominatim `/search` endpoint. Coordinates are strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Geocoder backed by an OpenStreetMap Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a client for the Nominatim instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, PulseError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PulseError::Internal(format!("geocoder client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, PulseError> {
        Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("format", "json"), ("limit", "1"), ("q", query)],
        )
        .map_err(|e| PulseError::Internal(format!("geocoder url: {e}")))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Coordinates, PulseError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PulseError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }

        let response = self
            .client
            .get(self.search_url(query)?)
            .send()
            .await
            .map_err(|e| PulseError::GeoLookupError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PulseError::GeoLookupError(format!(
                "geocoder returned {status}"
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| PulseError::GeoLookupError(e.to_string()))?;

        first_hit(&places)
    }
}

/// Takes the first hit and parses its coordinates.
fn first_hit(places: &[NominatimPlace]) -> Result<Coordinates, PulseError> {
    let place = places
        .first()
        .ok_or_else(|| PulseError::GeoLookupError("location not found".to_string()))?;
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|_| PulseError::GeoLookupError(format!("bad latitude {:?}", place.lat)))?;
    let lng = place
        .lon
        .parse::<f64>()
        .map_err(|_| PulseError::GeoLookupError(format!("bad longitude {:?}", place.lon)))?;
    Ok(Coordinates::new(lat, lng))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn places(json: &str) -> Vec<NominatimPlace> {
        let Ok(places) = serde_json::from_str(json) else {
            panic!("fixture must parse");
        };
        places
    }

    #[test]
    fn first_hit_parses_string_coordinates() {
        let hits = places(
            r#"[{"lat":"48.8566","lon":"2.3522","display_name":"Paris"},
                {"lat":"33.66","lon":"-95.55","display_name":"Paris, TX"}]"#,
        );
        let Ok(coords) = first_hit(&hits) else {
            panic!("expected a hit");
        };
        assert_eq!(coords, Coordinates::new(48.8566, 2.3522));
    }

    #[test]
    fn no_hits_is_not_found() {
        let Err(PulseError::GeoLookupError(msg)) = first_hit(&[]) else {
            panic!("expected GeoLookupError");
        };
        assert_eq!(msg, "location not found");
    }

    #[test]
    fn unparsable_coordinates_are_lookup_errors() {
        let hits = places(r#"[{"lat":"north","lon":"2.35"}]"#);
        assert!(matches!(first_hit(&hits), Err(PulseError::GeoLookupError(_))));
    }

    #[test]
    fn search_url_encodes_query() {
        let Ok(geocoder) = NominatimGeocoder::new("https://geo.example/", "test") else {
            panic!("client should build");
        };
        let Ok(url) = geocoder.search_url("Times Square & 7th") else {
            panic!("url should build");
        };
        assert_eq!(url.path(), "/search");
        assert!(url.as_str().contains("q=Times+Square+%26+7th"));
        assert!(url.as_str().contains("format=json"));
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_request() {
        let Ok(geocoder) = NominatimGeocoder::new("http://127.0.0.1:9", "test") else {
            panic!("client should build");
        };
        let result = geocoder.search("   ").await;
        assert!(matches!(result, Err(PulseError::InvalidRequest(_))));
    }
}
