//! Service layer: business logic orchestration.
//!
//! [`UpdateService`] coordinates store access and emits events through the
//! [`super::domain::EventBus`]. [`SummaryService`] wraps the AI boundary.

pub mod demo;
pub mod summary_service;
pub mod sweeper;
pub mod update_service;

use chrono::Utc;

use crate::domain::EpochMillis;

pub use summary_service::SummaryService;
pub use sweeper::spawn_sweeper;
pub use update_service::{CreateUpdate, UpdateService};

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> EpochMillis {
    Utc::now().timestamp_millis()
}
