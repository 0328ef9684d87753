//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::clients::Geocoder;
use crate::domain::{EventBus, ViewState};
use crate::service::{SummaryService, UpdateService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Update service for all feed business logic.
    pub update_service: Arc<UpdateService>,
    /// AI pulse-check service.
    pub summary_service: Arc<SummaryService>,
    /// Place search boundary.
    pub geocoder: Arc<dyn Geocoder>,
    /// Event bus for WebSocket feed sessions.
    pub event_bus: EventBus,
    /// View every new session starts from.
    pub view_defaults: ViewState,
}
