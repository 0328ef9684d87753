//! PostgreSQL implementation of the update store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::UpdateStore;
use super::models::{UpdateRow, UpdateTuple};
use crate::config::PulseConfig;
use crate::domain::{EpochMillis, NewUpdate, Update, UpdateId};
use crate::error::PulseError;

const SELECT_COLUMNS: &str = "id, category, description, lat, lng, timestamp_ms, \
     expires_at_ms, likes, author_id";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS updates (\
     id UUID PRIMARY KEY DEFAULT gen_random_uuid(), \
     category TEXT NOT NULL, \
     description TEXT NOT NULL, \
     lat DOUBLE PRECISION NOT NULL, \
     lng DOUBLE PRECISION NOT NULL, \
     timestamp_ms BIGINT NOT NULL, \
     expires_at_ms BIGINT NOT NULL, \
     likes BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0), \
     author_id TEXT, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
     CHECK (expires_at_ms > timestamp_ms))";

const CREATE_EXPIRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS updates_expires_at_idx ON updates (expires_at_ms, timestamp_ms DESC)";

/// PostgreSQL-backed update store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresUpdateStore {
    pool: PgPool,
}

impl PostgresUpdateStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from the configured database settings.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] if the database cannot be
    /// reached.
    pub async fn connect(config: &PulseConfig) -> Result<Self, PulseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the `updates` table and its expiry index if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::PersistenceError`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), PulseError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_EXPIRY_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UpdateStore for PostgresUpdateStore {
    async fn insert(&self, new: NewUpdate) -> Result<Update, PulseError> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            "INSERT INTO updates (category, description, lat, lng, timestamp_ms, expires_at_ms, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(new.category.as_str())
        .bind(&new.description)
        .bind(new.location.lat)
        .bind(new.location.lng)
        .bind(new.timestamp)
        .bind(new.expires_at)
        .bind(new.author_id.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(new.into_update(UpdateId::from_uuid(id)))
    }

    async fn fetch_active(&self, now: EpochMillis) -> Result<Vec<Update>, PulseError> {
        let rows = sqlx::query_as::<_, UpdateTuple>(&format!(
            "SELECT {SELECT_COLUMNS} FROM updates WHERE expires_at_ms > $1 \
             ORDER BY expires_at_ms ASC, timestamp_ms DESC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|t| Update::try_from(UpdateRow::from(t)))
            .collect()
    }

    async fn get(&self, id: UpdateId) -> Result<Option<Update>, PulseError> {
        let row = sqlx::query_as::<_, UpdateTuple>(&format!(
            "SELECT {SELECT_COLUMNS} FROM updates WHERE id = $1"
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|t| Update::try_from(UpdateRow::from(t))).transpose()
    }

    async fn delete(&self, id: UpdateId) -> Result<bool, PulseError> {
        let result = sqlx::query("DELETE FROM updates WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: EpochMillis) -> Result<u64, PulseError> {
        let result = sqlx::query("DELETE FROM updates WHERE expires_at_ms <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
