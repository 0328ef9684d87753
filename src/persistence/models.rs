//! Row model for the `updates` table and its mapping to the domain entity.

use uuid::Uuid;

use crate::domain::{Category, Coordinates, Update, UpdateId};
use crate::error::PulseError;

/// A stored row from the `updates` table.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRow {
    /// Primary key.
    pub id: Uuid,
    /// Category name (e.g. `"TRAFFIC"`).
    pub category: String,
    /// Description text.
    pub description: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Creation time in epoch milliseconds.
    pub timestamp_ms: i64,
    /// Expiry time in epoch milliseconds.
    pub expires_at_ms: i64,
    /// Like counter.
    pub likes: i64,
    /// Posting user, if any.
    pub author_id: Option<String>,
}

/// Column tuple as returned by `SELECT` on the `updates` table.
pub type UpdateTuple = (
    Uuid,
    String,
    String,
    f64,
    f64,
    i64,
    i64,
    i64,
    Option<String>,
);

impl From<UpdateTuple> for UpdateRow {
    fn from(
        (id, category, description, lat, lng, timestamp_ms, expires_at_ms, likes, author_id): UpdateTuple,
    ) -> Self {
        Self {
            id,
            category,
            description,
            lat,
            lng,
            timestamp_ms,
            expires_at_ms,
            likes,
            author_id,
        }
    }
}

impl TryFrom<UpdateRow> for Update {
    type Error = PulseError;

    fn try_from(row: UpdateRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|_| {
            PulseError::PersistenceError(format!(
                "row {} has unknown category {:?}",
                row.id, row.category
            ))
        })?;
        let likes = u32::try_from(row.likes).map_err(|_| {
            PulseError::PersistenceError(format!("row {} has invalid likes {}", row.id, row.likes))
        })?;

        Ok(Self {
            id: UpdateId::from_uuid(row.id),
            category,
            description: row.description,
            location: Coordinates::new(row.lat, row.lng),
            timestamp: row.timestamp_ms,
            expires_at: row.expires_at_ms,
            likes,
            author_id: row.author_id,
        })
    }
}
