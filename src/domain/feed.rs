//! Active/nearby filter-sort pipeline.
//!
//! [`select_feed`] is the single place where expiry, radius, and ordering
//! rules are applied. Both the live session (in-memory collection) and the
//! store-backed nearby query run their updates through it, so the two can
//! never disagree on what "nearby and active" means.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::update::{EpochMillis, Update, is_active};
use super::Coordinates;
use crate::error::PulseError;

/// Radius used when a caller does not provide one.
pub const DEFAULT_RADIUS_KM: f64 = 20.0;

/// Whether an update exactly `radius_km` away is part of the feed.
///
/// Parsed case-insensitively from both env values and request bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RadiusBoundary {
    /// `distance <= radius`.
    #[default]
    Inclusive,
    /// `distance < radius`.
    Exclusive,
}

impl RadiusBoundary {
    /// Returns `true` if `distance_km` lies within `radius_km`.
    #[must_use]
    pub fn contains(self, distance_km: f64, radius_km: f64) -> bool {
        match self {
            Self::Inclusive => distance_km <= radius_km,
            Self::Exclusive => distance_km < radius_km,
        }
    }
}

impl fmt::Display for RadiusBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusive => f.write_str("inclusive"),
            Self::Exclusive => f.write_str("exclusive"),
        }
    }
}

impl FromStr for RadiusBoundary {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inclusive" => Ok(Self::Inclusive),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(PulseError::InvalidRequest(format!(
                "invalid radius boundary: {other}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for RadiusBoundary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything the pipeline needs besides the updates themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedQuery {
    /// Center of the search circle.
    pub center: Coordinates,
    /// Search radius in kilometres.
    pub radius_km: f64,
    /// Treatment of updates exactly on the circle.
    pub boundary: RadiusBoundary,
    /// Evaluation time for the expiry check.
    pub now: EpochMillis,
}

impl FeedQuery {
    /// Creates a query with the default radius and boundary.
    #[must_use]
    pub fn around(center: Coordinates, now: EpochMillis) -> Self {
        Self {
            center,
            radius_km: DEFAULT_RADIUS_KM,
            boundary: RadiusBoundary::default(),
            now,
        }
    }

    /// Returns `true` if `update` is active and inside the circle.
    #[must_use]
    pub fn admits(&self, update: &Update) -> bool {
        is_active(update, self.now)
            && self
                .boundary
                .contains(self.center.distance_km(&update.location), self.radius_km)
    }
}

/// Filters `source` to active updates within the query circle, most recent
/// first.
///
/// Accepts borrowed slices (`&[Update]`) and owned query results alike. The
/// sort is stable: updates with equal timestamps keep their input order.
pub fn select_feed<I>(source: I, query: &FeedQuery) -> Vec<Update>
where
    I: IntoIterator,
    I::Item: Borrow<Update>,
{
    let mut selected: Vec<Update> = source
        .into_iter()
        .filter_map(|item| {
            let update: &Update = item.borrow();
            query.admits(update).then(|| update.clone())
        })
        .collect();
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    selected
}
