//! Persistence layer: the `updates` collection.
//!
//! [`UpdateStore`] is the boundary the service talks to. Two
//! implementations exist: [`memory::InMemoryUpdateStore`] for tests, demos,
//! and single-node runs, and [`postgres::PostgresUpdateStore`] backed by
//! `sqlx::PgPool`. Neither evaluates geo-radius queries; distance filtering
//! always happens after the time-bounded fetch.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{EpochMillis, NewUpdate, Update, UpdateId};
use crate::error::PulseError;

pub use memory::InMemoryUpdateStore;
pub use postgres::PostgresUpdateStore;

/// Name of the collection (table) holding updates.
pub const UPDATES_COLLECTION: &str = "updates";

/// Storage operations needed by the update service.
#[async_trait]
pub trait UpdateStore: Send + Sync + std::fmt::Debug {
    /// Persists a new update and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the write fails.
    async fn insert(&self, new: NewUpdate) -> Result<Update, PulseError>;

    /// Fetches every update with `expires_at > now`, ordered by
    /// `expires_at` ascending then `timestamp` descending.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the read fails.
    async fn fetch_active(&self, now: EpochMillis) -> Result<Vec<Update>, PulseError>;

    /// Fetches a single update regardless of expiry.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the read fails.
    async fn get(&self, id: UpdateId) -> Result<Option<Update>, PulseError>;

    /// Deletes an update by id. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the delete fails.
    async fn delete(&self, id: UpdateId) -> Result<bool, PulseError>;

    /// Deletes every update with `expires_at <= now` and returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the delete fails.
    async fn delete_expired(&self, now: EpochMillis) -> Result<u64, PulseError>;
}
