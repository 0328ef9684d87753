//! The city update entity and its creation rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::{Coordinates, UpdateId};
use crate::error::PulseError;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Milliseconds in one hour.
pub const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Lifetime applied when the poster does not choose one.
pub const DEFAULT_LIFETIME_HOURS: f64 = 2.0;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 140;

/// Kind of city update. Drives the display label and color only.
///
/// Deserialization goes through [`FromStr`] and ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Congestion, closures, road works.
    Traffic,
    /// Crowding at a place.
    Crowd,
    /// Hazards and broken infrastructure.
    Issue,
    /// Happenings worth attending.
    Event,
    /// Local news.
    Neighborhood,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Traffic,
        Self::Crowd,
        Self::Issue,
        Self::Event,
        Self::Neighborhood,
    ];

    /// Wire and storage name (e.g. `"TRAFFIC"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "TRAFFIC",
            Self::Crowd => "CROWD",
            Self::Issue => "ISSUE",
            Self::Event => "EVENT",
            Self::Neighborhood => "NEIGHBORHOOD",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Traffic => "Traffic",
            Self::Crowd => "Crowd",
            Self::Issue => "Issue/Hazard",
            Self::Event => "Event",
            Self::Neighborhood => "News",
        }
    }

    /// Marker color as a hex string.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Traffic => "#ef4444",
            Self::Crowd => "#f59e0b",
            Self::Issue => "#f97316",
            Self::Event => "#8b5cf6",
            Self::Neighborhood => "#10b981",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PulseError::InvalidRequest(format!("unknown category: {s}")))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A short-lived, geo-tagged city update.
///
/// Never mutated after creation. Whether it is active is derived from
/// `expires_at` at read time; see [`is_active`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    /// Store-assigned identifier.
    pub id: UpdateId,
    /// Kind of update.
    pub category: Category,
    /// Free text, at most [`MAX_DESCRIPTION_CHARS`] characters.
    pub description: String,
    /// Where the update was reported.
    pub location: Coordinates,
    /// Creation time.
    pub timestamp: EpochMillis,
    /// Absolute expiry time; always greater than `timestamp`.
    pub expires_at: EpochMillis,
    /// Like counter.
    pub likes: u32,
    /// Posting user, absent for anonymous and demo data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Update {
    /// Shorthand for [`is_active`].
    #[must_use]
    pub fn is_active(&self, now: EpochMillis) -> bool {
        is_active(self, now)
    }

    /// Whole minutes since the update was posted, never negative.
    #[must_use]
    pub fn minutes_ago(&self, now: EpochMillis) -> i64 {
        (now.saturating_sub(self.timestamp) / 60_000).max(0)
    }
}

/// Returns `true` while `update` has not expired at `now`.
#[must_use]
pub fn is_active(update: &Update, now: EpochMillis) -> bool {
    update.expires_at > now
}

/// A validated update that has not been persisted yet.
///
/// Produced by [`NewUpdate::new`], consumed by the store which assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUpdate {
    /// Kind of update.
    pub category: Category,
    /// Trimmed description.
    pub description: String,
    /// Where the update was reported.
    pub location: Coordinates,
    /// Creation time.
    pub timestamp: EpochMillis,
    /// Absolute expiry time.
    pub expires_at: EpochMillis,
    /// Posting user.
    pub author_id: Option<String>,
}

impl NewUpdate {
    /// Validates the input and stamps creation and expiry times.
    ///
    /// `lifetime_hours` defaults to [`DEFAULT_LIFETIME_HOURS`].
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::InvalidRequest`] if the description is blank or
    /// longer than [`MAX_DESCRIPTION_CHARS`], or if the lifetime is not a
    /// positive finite number of hours.
    pub fn new(
        category: Category,
        description: &str,
        location: Coordinates,
        author_id: Option<String>,
        lifetime_hours: Option<f64>,
        now: EpochMillis,
    ) -> Result<Self, PulseError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PulseError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }
        let chars = description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(PulseError::InvalidRequest(format!(
                "description is {chars} characters; the limit is {MAX_DESCRIPTION_CHARS}"
            )));
        }

        let lifetime = lifetime_millis(lifetime_hours.unwrap_or(DEFAULT_LIFETIME_HOURS))?;
        let expires_at = now
            .checked_add(lifetime)
            .ok_or_else(|| PulseError::InvalidRequest("lifetime overflows".to_string()))?;

        Ok(Self {
            category,
            description: description.to_string(),
            location,
            timestamp: now,
            expires_at,
            author_id: author_id.filter(|a| !a.is_empty()),
        })
    }

    /// Completes the entity with the identifier assigned by the store.
    #[must_use]
    pub fn into_update(self, id: UpdateId) -> Update {
        Update {
            id,
            category: self.category,
            description: self.description,
            location: self.location,
            timestamp: self.timestamp,
            expires_at: self.expires_at,
            likes: 0,
            author_id: self.author_id,
        }
    }
}

/// Converts a lifetime in hours to whole milliseconds.
///
/// # Errors
///
/// Returns [`PulseError::InvalidRequest`] unless the lifetime is finite and
/// rounds to at least one millisecond.
pub fn lifetime_millis(hours: f64) -> Result<i64, PulseError> {
    #[allow(clippy::cast_precision_loss)]
    let max_hours = (i64::MAX / MILLIS_PER_HOUR) as f64;
    if !hours.is_finite() || hours > max_hours {
        return Err(PulseError::InvalidRequest(format!(
            "invalid lifetime: {hours} hours"
        )));
    }
    #[allow(clippy::cast_precision_loss)]
    let millis = (hours * MILLIS_PER_HOUR as f64).round();
    if millis < 1.0 {
        return Err(PulseError::InvalidRequest(
            "lifetime must be positive".to_string(),
        ));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(millis as i64)
}
