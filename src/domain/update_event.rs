//! Domain events reflecting changes to the update collection.
//!
//! Every write publishes an [`UpdateEvent`] through the [`super::EventBus`].
//! Live feed sessions apply them to their local collection and recompute.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::update::EpochMillis;
use super::{Update, UpdateId};

/// Domain event emitted after every write to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum UpdateEvent {
    /// A new update was posted.
    UpdateCreated {
        /// The stored entity, id included.
        update: Update,
        /// Emission time.
        timestamp: DateTime<Utc>,
    },

    /// An update was deleted by id.
    UpdateRemoved {
        /// Removed update.
        update_id: UpdateId,
        /// Emission time.
        timestamp: DateTime<Utc>,
    },

    /// The sweep removed every update with `expires_at <= cutoff`.
    ExpiredSwept {
        /// Sweep evaluation time.
        cutoff: EpochMillis,
        /// Number of rows removed.
        removed: u64,
        /// Emission time.
        timestamp: DateTime<Utc>,
    },
}

impl UpdateEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::UpdateCreated { .. } => "update_created",
            Self::UpdateRemoved { .. } => "update_removed",
            Self::ExpiredSwept { .. } => "expired_swept",
        }
    }

    /// Applies this event to an in-memory collection of updates.
    pub fn apply_to(&self, collection: &mut Vec<Update>) {
        match self {
            Self::UpdateCreated { update, .. } => {
                if !collection.iter().any(|u| u.id == update.id) {
                    collection.push(update.clone());
                }
            }
            Self::UpdateRemoved { update_id, .. } => {
                collection.retain(|u| u.id != *update_id);
            }
            Self::ExpiredSwept { cutoff, .. } => {
                collection.retain(|u| u.expires_at > *cutoff);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Category, Coordinates};

    fn update(expires_at: EpochMillis) -> Update {
        Update {
            id: UpdateId::new(),
            category: Category::Crowd,
            description: "queue".to_string(),
            location: Coordinates::new(0.0, 0.0),
            timestamp: 0,
            expires_at,
            likes: 0,
            author_id: None,
        }
    }

    #[test]
    fn created_serializes_with_tag() {
        let event = UpdateEvent::UpdateCreated {
            update: update(10),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"update_created\""));
        assert!(json.contains("\"expiresAt\":10"));
        assert_eq!(event.event_type_str(), "update_created");
    }

    #[test]
    fn created_is_applied_once() {
        let u = update(10);
        let event = UpdateEvent::UpdateCreated {
            update: u.clone(),
            timestamp: Utc::now(),
        };
        let mut collection = Vec::new();
        event.apply_to(&mut collection);
        event.apply_to(&mut collection);
        assert_eq!(collection, vec![u]);
    }

    #[test]
    fn removed_drops_matching_id() {
        let keep = update(10);
        let gone = update(10);
        let mut collection = vec![keep.clone(), gone.clone()];
        UpdateEvent::UpdateRemoved {
            update_id: gone.id,
            timestamp: Utc::now(),
        }
        .apply_to(&mut collection);
        assert_eq!(collection, vec![keep]);
    }

    #[test]
    fn swept_drops_expired_at_cutoff() {
        let expired = update(100);
        let alive = update(101);
        let mut collection = vec![expired, alive.clone()];
        UpdateEvent::ExpiredSwept {
            cutoff: 100,
            removed: 1,
            timestamp: Utc::now(),
        }
        .apply_to(&mut collection);
        assert_eq!(collection, vec![alive]);
    }
}
