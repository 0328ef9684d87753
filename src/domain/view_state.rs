//! Map/feed view state.
//!
//! A [`ViewState`] is a plain value. Callers hand it to
//! [`ViewState::feed_query`] whenever they need the feed, so nothing about
//! the current center is held in ambient state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::feed::{FeedQuery, RadiusBoundary};
use super::update::EpochMillis;
use super::Coordinates;

/// Default map center: New York City.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(40.7128, -74.0060);

/// Default map zoom level.
pub const DEFAULT_ZOOM: u8 = 15;

/// Zoom applied after a successful place search.
pub const SEARCH_ZOOM: u8 = 13;

/// Whether the client shows the map or the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Markers on a map.
    #[default]
    Map,
    /// Scrollable list.
    Feed,
}

/// Radius and boundary applied to every feed computed for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSettings {
    /// Search radius in kilometres.
    pub radius_km: f64,
    /// Treatment of updates exactly on the radius.
    pub boundary: RadiusBoundary,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            radius_km: super::feed::DEFAULT_RADIUS_KM,
            boundary: RadiusBoundary::default(),
        }
    }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ViewState {
    /// Map or list.
    pub mode: ViewMode,
    /// Viewport center; the feed is computed around this point.
    pub center: Coordinates,
    /// Map zoom level.
    pub zoom: u8,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::centered(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl ViewState {
    /// Map view at the given center and zoom.
    #[must_use]
    pub const fn centered(center: Coordinates, zoom: u8) -> Self {
        Self {
            mode: ViewMode::Map,
            center,
            zoom,
        }
    }

    /// Feed query for this view at time `now`.
    #[must_use]
    pub fn feed_query(&self, settings: &FeedSettings, now: EpochMillis) -> FeedQuery {
        FeedQuery {
            center: self.center,
            radius_km: settings.radius_km,
            boundary: settings.boundary,
            now,
        }
    }

    /// Moves the view to a searched place: map mode at search zoom.
    pub fn jump_to(&mut self, center: Coordinates) {
        self.center = center;
        self.zoom = SEARCH_ZOOM;
        self.mode = ViewMode::Map;
    }
}
