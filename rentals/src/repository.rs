//! Durable copy of the reservation state.
//!
//! The reducer's in-memory state answers every read; the repository keeps a
//! copy that outlives the process. The service writes each change through
//! before reporting success and reloads everything at startup.

use crate::types::{Reservation, ReservationId};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Reservation repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database failure
    #[error("Reservation storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result alias for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Persistence for reservations
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert `reservation`, or replace the stored copy with the same id
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backend fails.
    async fn save(&self, reservation: &Reservation) -> Result<()>;

    /// Every stored reservation, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the backend fails.
    async fn load_all(&self) -> Result<Vec<Reservation>>;
}

// ============================================================================
// In-memory
// ============================================================================

/// Repository backed by a `HashMap`; lives as long as the process
#[derive(Debug, Default)]
pub struct InMemoryReservationRepository {
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn save(&self, reservation: &Reservation) -> Result<()> {
        self.reservations
            .write()
            .await
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Reservation>> {
        let mut all: Vec<Reservation> = self.reservations.read().await.values().cloned().collect();
        all.sort_by_key(|r| (r.created_at, *r.id.as_uuid()));
        Ok(all)
    }
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// `PostgreSQL`-backed reservation repository.
///
/// One row per reservation in the `reservations` table: the full record as
/// JSONB plus the ids and status as columns for ad hoc queries. Shares its
/// pool and migrations with [`crate::properties::PostgresPropertyStore`].
#[derive(Clone, Debug)]
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    #[tracing::instrument(skip(self, reservation), fields(store = "reservations", reservation_id = %reservation.id))]
    async fn save(&self, reservation: &Reservation) -> Result<()> {
        let json = serde_json::to_value(reservation)
            .map_err(|e| RepositoryError::Storage(format!("Failed to serialize reservation: {e}")))?;

        sqlx::query(
            "INSERT INTO reservations
                (id, property_id, owner_id, guest_id, status, data, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at",
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.property_id.as_uuid())
        .bind(reservation.owner_id.as_uuid())
        .bind(reservation.guest_id.as_uuid())
        .bind(reservation.status.as_str())
        .bind(json)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(store = "reservations"))]
    async fn load_all(&self) -> Result<Vec<Reservation>> {
        let rows: Vec<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM reservations ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(json,)| {
                serde_json::from_value(json).map_err(|e| {
                    RepositoryError::Storage(format!("Failed to deserialize reservation: {e}"))
                })
            })
            .collect()
    }
}
