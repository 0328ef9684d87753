//! Per-connection feed state.
//!
//! A [`FeedSession`] owns the view and a local copy of the active
//! collection. Every change recomputes the feed from scratch through
//! [`select_feed`].

use crate::api::dto::FeedItemDto;
use crate::domain::{
    Coordinates, EpochMillis, FeedSettings, Update, UpdateEvent, ViewMode, ViewState, select_feed,
};
use crate::error::PulseError;

use super::messages::FeedSnapshot;

/// View, device location and collection for one live client.
#[derive(Debug, Clone)]
pub struct FeedSession {
    view: ViewState,
    settings: FeedSettings,
    user_location: Option<Coordinates>,
    collection: Vec<Update>,
}

impl FeedSession {
    /// Empty session starting at `view`.
    #[must_use]
    pub const fn new(view: ViewState, settings: FeedSettings) -> Self {
        Self {
            view,
            settings,
            user_location: None,
            collection: Vec::new(),
        }
    }

    /// Current view.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Last successfully reported device location.
    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    /// Number of updates held locally.
    #[must_use]
    pub fn collection_len(&self) -> usize {
        self.collection.len()
    }

    /// Replaces the local collection with a fresh store read.
    pub fn reseed(&mut self, updates: Vec<Update>) {
        self.collection = updates;
    }

    /// Applies a domain event to the local collection, then drops every
    /// update that has expired by `now`.
    ///
    /// Expired rows leave the local collection even when no sweep runs.
    pub fn apply_event(&mut self, event: &UpdateEvent, now: EpochMillis) {
        event.apply_to(&mut self.collection);
        self.prune_expired(now);
    }

    /// Drops updates with `expires_at <= now`.
    pub fn prune_expired(&mut self, now: EpochMillis) {
        self.collection.retain(|u| u.is_active(now));
    }

    /// Patches the view; `None` fields are left unchanged.
    pub fn patch_view(
        &mut self,
        mode: Option<ViewMode>,
        center: Option<Coordinates>,
        zoom: Option<u8>,
    ) {
        if let Some(mode) = mode {
            self.view.mode = mode;
        }
        if let Some(center) = center {
            self.view.center = center;
        }
        if let Some(zoom) = zoom {
            self.view.zoom = zoom;
        }
    }

    /// Records a device-location result.
    ///
    /// A position recenters the view on it. A failure is logged and leaves
    /// both the view and the last known location untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`PulseError::LocationUnavailable`] it was given.
    pub fn locate(&mut self, report: Result<Coordinates, PulseError>) -> Result<(), PulseError> {
        match report {
            Ok(position) => {
                self.user_location = Some(position);
                self.view.center = position;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "device location unavailable");
                Err(e)
            }
        }
    }

    /// Recenters on a searched place.
    pub fn jump_to(&mut self, center: Coordinates) {
        self.view.jump_to(center);
    }

    /// Active updates around the view center at `now`, most recent first.
    #[must_use]
    pub fn feed(&self, now: EpochMillis) -> Vec<Update> {
        select_feed(&self.collection, &self.view.feed_query(&self.settings, now))
    }

    /// Feed push payload for the current state.
    #[must_use]
    pub fn snapshot(&self, trigger: &'static str, now: EpochMillis) -> FeedSnapshot {
        let center = self.view.center;
        let updates: Vec<FeedItemDto> = self
            .feed(now)
            .into_iter()
            .map(|u| FeedItemDto::new(u, &center))
            .collect();
        FeedSnapshot {
            kind: "feed",
            trigger,
            view: self.view,
            user_location: self.user_location,
            radius_km: self.settings.radius_km,
            boundary: self.settings.boundary,
            count: updates.len(),
            updates,
        }
    }
}
