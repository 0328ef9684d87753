//! Domain layer: the update entity, geo math, feed pipeline, and events.
//!
//! Everything here is pure except the [`EventBus`]. The feed pipeline takes
//! the evaluation time as an argument so results depend only on their
//! inputs.

pub mod event_bus;
pub mod feed;
pub mod geo;
pub mod update;
pub mod update_event;
pub mod update_id;
pub mod view_state;

pub use event_bus::EventBus;
pub use feed::{FeedQuery, RadiusBoundary, select_feed};
pub use geo::{Coordinates, format_distance, haversine_km};
pub use update::{Category, EpochMillis, NewUpdate, Update, is_active};
pub use update_event::UpdateEvent;
pub use update_id::UpdateId;
pub use view_state::{FeedSettings, ViewMode, ViewState};
