//! Update service: create, query, delete, and sweep updates.

use std::sync::Arc;

use chrono::Utc;

use super::now_millis;
use crate::domain::{
    Category, Coordinates, EpochMillis, EventBus, FeedQuery, FeedSettings, NewUpdate,
    RadiusBoundary, Update, UpdateEvent, UpdateId, select_feed,
};
use crate::error::PulseError;
use crate::persistence::UpdateStore;

/// Input for [`UpdateService::create_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUpdate {
    /// Kind of update.
    pub category: Category,
    /// Free text; trimmed and capped at 140 characters.
    pub description: String,
    /// Where the update happened.
    pub location: Coordinates,
    /// Posting user.
    pub author_id: Option<String>,
    /// Lifetime in hours; defaults to 2.
    pub lifetime_hours: Option<f64>,
}

/// Orchestration layer for every update operation.
///
/// Owns the store handle and the [`EventBus`]. Every write follows the same
/// pattern: validate, write to the store, publish an event, return.
#[derive(Debug, Clone)]
pub struct UpdateService {
    store: Arc<dyn UpdateStore>,
    event_bus: EventBus,
    feed: FeedSettings,
}

impl UpdateService {
    /// Creates a new `UpdateService`.
    #[must_use]
    pub fn new(store: Arc<dyn UpdateStore>, event_bus: EventBus, feed: FeedSettings) -> Self {
        Self {
            store,
            event_bus,
            feed,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Radius and boundary applied when a caller does not override them.
    #[must_use]
    pub fn feed_settings(&self) -> &FeedSettings {
        &self.feed
    }

    /// Posts a new update stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::InvalidRequest`] for invalid input and
    /// [`PulseError::PersistenceError`] if the write fails.
    pub async fn create_update(&self, request: CreateUpdate) -> Result<Update, PulseError> {
        self.create_update_at(request, now_millis()).await
    }

    /// Posts a new update created at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::InvalidRequest`] for invalid input and
    /// [`PulseError::PersistenceError`] if the write fails.
    pub async fn create_update_at(
        &self,
        request: CreateUpdate,
        now: EpochMillis,
    ) -> Result<Update, PulseError> {
        let new = NewUpdate::new(
            request.category,
            &request.description,
            request.location,
            request.author_id,
            request.lifetime_hours,
            now,
        )?;

        let update = self.store.insert(new).await.inspect_err(|e| {
            tracing::warn!(error = %e, "failed to store update");
        })?;

        let _ = self.event_bus.publish(UpdateEvent::UpdateCreated {
            update: update.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            update_id = %update.id,
            category = %update.category,
            expires_at = update.expires_at,
            "update created"
        );
        Ok(update)
    }

    /// Every active update, in store order (`expires_at` asc, `timestamp`
    /// desc). No distance filter.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the read fails.
    pub async fn active_updates(&self, now: EpochMillis) -> Result<Vec<Update>, PulseError> {
        self.store.fetch_active(now).await.inspect_err(|e| {
            tracing::warn!(error = %e, "failed to fetch active updates");
        })
    }

    /// Active updates around `center`, most recent first.
    ///
    /// `radius_km` and `boundary` default to the service feed settings.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::InvalidRequest`] for a non-positive radius and
    /// [`PulseError::PersistenceError`] if the read fails.
    pub async fn nearby_updates(
        &self,
        center: Coordinates,
        radius_km: Option<f64>,
        boundary: Option<RadiusBoundary>,
        now: EpochMillis,
    ) -> Result<Vec<Update>, PulseError> {
        let radius_km = radius_km.unwrap_or(self.feed.radius_km);
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(PulseError::InvalidRequest(format!(
                "radius must be positive, got {radius_km}"
            )));
        }
        let query = FeedQuery {
            center,
            radius_km,
            boundary: boundary.unwrap_or(self.feed.boundary),
            now,
        };
        self.nearby(&query).await
    }

    /// Runs `query` against the store: time bound remotely, distance bound
    /// locally.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the read fails.
    pub async fn nearby(&self, query: &FeedQuery) -> Result<Vec<Update>, PulseError> {
        let active = self.active_updates(query.now).await?;
        let feed = select_feed(active, query);
        tracing::debug!(
            lat = query.center.lat,
            lng = query.center.lng,
            radius_km = query.radius_km,
            count = feed.len(),
            "nearby updates"
        );
        Ok(feed)
    }

    /// Fetches one update by id, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::UpdateNotFound`] if it does not exist and
    /// [`PulseError::PersistenceError`] if the read fails.
    pub async fn get_update(&self, id: UpdateId) -> Result<Update, PulseError> {
        self.store
            .get(id)
            .await?
            .ok_or(PulseError::UpdateNotFound(*id.as_uuid()))
    }

    /// Deletes an update by id.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::UpdateNotFound`] if it does not exist and
    /// [`PulseError::PersistenceError`] if the delete fails.
    pub async fn delete_update(&self, id: UpdateId) -> Result<(), PulseError> {
        let removed = self.store.delete(id).await.inspect_err(|e| {
            tracing::warn!(update_id = %id, error = %e, "failed to delete update");
        })?;
        if !removed {
            return Err(PulseError::UpdateNotFound(*id.as_uuid()));
        }

        let _ = self.event_bus.publish(UpdateEvent::UpdateRemoved {
            update_id: id,
            timestamp: Utc::now(),
        });

        tracing::info!(update_id = %id, "update deleted");
        Ok(())
    }

    /// Deletes every update with `expires_at <= now`; returns the count.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the delete fails.
    pub async fn sweep_expired(&self, now: EpochMillis) -> Result<u64, PulseError> {
        let removed = self.store.delete_expired(now).await.inspect_err(|e| {
            tracing::warn!(error = %e, "expiry sweep failed");
        })?;

        if removed > 0 {
            let _ = self.event_bus.publish(UpdateEvent::ExpiredSwept {
                cutoff: now,
                removed,
                timestamp: Utc::now(),
            });
            tracing::info!(removed, cutoff = now, "expired updates swept");
        }
        Ok(removed)
    }
}
