//! WebSocket message types: envelope, commands, and feed pushes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::dto::FeedItemDto;
use crate::domain::{Coordinates, RadiusBoundary, ViewMode, ViewState};
use crate::error::PulseError;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for pushes.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Error message carrying the error's numeric code and text.
    #[must_use]
    pub fn error(id: impl Into<String>, err: &PulseError) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": err.error_code(),
                "message": err.to_string(),
            }),
        )
    }

    /// Serializes to a JSON text frame body.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client feed push.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Patch the session view; absent fields stay as they are.
    SetView {
        /// Map or list.
        #[serde(default)]
        mode: Option<ViewMode>,
        /// New viewport center.
        #[serde(default)]
        center: Option<Coordinates>,
        /// New zoom level.
        #[serde(default)]
        zoom: Option<u8>,
    },
    /// Device-location result: a position, or the reason there is none.
    Locate {
        /// Reported latitude.
        #[serde(default)]
        lat: Option<f64>,
        /// Reported longitude.
        #[serde(default)]
        lng: Option<f64>,
        /// Failure reason (permission denied, timeout, ...).
        #[serde(default)]
        error: Option<String>,
    },
    /// Geocode a place name and recenter on it.
    Search {
        /// Free-text place search.
        query: String,
    },
    /// Reload the session collection from the store.
    Refresh,
}

/// Turns the fields of a `locate` command into a position or a
/// [`PulseError::LocationUnavailable`].
///
/// # Errors
///
/// Returns [`PulseError::LocationUnavailable`] if the client reported a
/// failure or sent an incomplete position.
pub fn location_report(
    lat: Option<f64>,
    lng: Option<f64>,
    error: Option<String>,
) -> Result<Coordinates, PulseError> {
    match (lat, lng, error) {
        (_, _, Some(reason)) => Err(PulseError::LocationUnavailable(reason)),
        (Some(lat), Some(lng), None) if lat.is_finite() && lng.is_finite() => {
            Ok(Coordinates::new(lat, lng))
        }
        _ => Err(PulseError::LocationUnavailable(
            "position missing from report".to_string(),
        )),
    }
}

/// Payload of a `feed` push: the current view and its computed feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Always `"feed"`.
    pub kind: &'static str,
    /// What caused the push (`"seed"`, a command name or a domain event type).
    pub trigger: &'static str,
    /// View the feed was computed for.
    pub view: ViewState,
    /// Last reported device location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<Coordinates>,
    /// Radius applied, in km.
    pub radius_km: f64,
    /// Boundary rule applied.
    pub boundary: RadiusBoundary,
    /// Number of items.
    pub count: usize,
    /// Active updates inside the radius, most recent first.
    pub updates: Vec<FeedItemDto>,
}
