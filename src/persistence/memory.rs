//! In-process update store.
//!
//! Keeps every update in insertion order behind a [`tokio::sync::RwLock`].
//! Reads share the lock; inserts and deletes serialize. Data is lost on
//! restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UpdateStore;
use crate::domain::{EpochMillis, NewUpdate, Update, UpdateId};
use crate::error::PulseError;

/// Update store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryUpdateStore {
    updates: RwLock<Vec<Update>>,
}

impl InMemoryUpdateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with existing updates.
    #[must_use]
    pub fn with_updates(updates: Vec<Update>) -> Self {
        Self {
            updates: RwLock::new(updates),
        }
    }

    /// Number of stored updates, expired ones included.
    pub async fn len(&self) -> usize {
        self.updates.read().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.updates.read().await.is_empty()
    }
}

#[async_trait]
impl UpdateStore for InMemoryUpdateStore {
    async fn insert(&self, new: NewUpdate) -> Result<Update, PulseError> {
        let mut updates = self.updates.write().await;
        let mut id = UpdateId::new();
        while updates.iter().any(|u| u.id == id) {
            id = UpdateId::new();
        }
        let update = new.into_update(id);
        updates.push(update.clone());
        Ok(update)
    }

    async fn fetch_active(&self, now: EpochMillis) -> Result<Vec<Update>, PulseError> {
        let updates = self.updates.read().await;
        let mut active: Vec<Update> = updates
            .iter()
            .filter(|u| u.expires_at > now)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        });
        Ok(active)
    }

    async fn get(&self, id: UpdateId) -> Result<Option<Update>, PulseError> {
        let updates = self.updates.read().await;
        Ok(updates.iter().find(|u| u.id == id).cloned())
    }

    async fn delete(&self, id: UpdateId) -> Result<bool, PulseError> {
        let mut updates = self.updates.write().await;
        let before = updates.len();
        updates.retain(|u| u.id != id);
        Ok(updates.len() < before)
    }

    async fn delete_expired(&self, now: EpochMillis) -> Result<u64, PulseError> {
        let mut updates = self.updates.write().await;
        let before = updates.len();
        updates.retain(|u| u.expires_at > now);
        Ok((before - updates.len()) as u64)
    }
}
