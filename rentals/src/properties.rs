//! Property store.
//!
//! Properties are owned by the listing side of the application; the
//! reservation lifecycle only needs to resolve them and read their owner.
//! Two implementations: an in-memory map for development and tests, and a
//! `PostgreSQL` table storing each property as JSONB. The Postgres store also
//! owns the connection pool and the migrations for the reservations table.

use crate::types::{OwnerId, Property, PropertyId};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Property store errors
#[derive(Error, Debug)]
pub enum PropertyStoreError {
    /// A property with this id is already stored
    #[error("Property {0} already exists")]
    Duplicate(PropertyId),

    /// Database failure
    #[error("Property storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for PropertyStoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result alias for property store operations
pub type Result<T> = std::result::Result<T, PropertyStoreError>;

/// Lookup and registration of properties
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Resolve a property by id
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError::Storage`] if the backend fails.
    async fn find(&self, id: PropertyId) -> Result<Option<Property>>;

    /// Every property of an owner, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError::Storage`] if the backend fails.
    async fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Property>>;

    /// Register a new property
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError::Duplicate`] if the id is taken.
    async fn insert(&self, property: Property) -> Result<()>;
}

// ============================================================================
// In-memory
// ============================================================================

/// Property store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    properties: RwLock<HashMap<PropertyId, Property>>,
}

impl InMemoryPropertyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn find(&self, id: PropertyId) -> Result<Option<Property>> {
        Ok(self.properties.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Property>> {
        let mut owned: Vec<Property> = self
            .properties
            .read()
            .await
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.created_at);
        Ok(owned)
    }

    async fn insert(&self, property: Property) -> Result<()> {
        let mut properties = self.properties.write().await;
        if properties.contains_key(&property.id) {
            return Err(PropertyStoreError::Duplicate(property.id));
        }
        properties.insert(property.id, property);
        Ok(())
    }
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// `PostgreSQL`-backed property store.
///
/// Stores properties as JSONB in the `properties` table, indexed by owner.
#[derive(Clone, Debug)]
pub struct PostgresPropertyStore {
    pool: PgPool,
}

impl PostgresPropertyStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for sharing with other stores
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a pool against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError::Storage`] if the database is unreachable.
    pub async fn connect(url: &str, max_connections: u32, connect_timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations (properties and reservations).
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PropertyStoreError::Storage(format!("Migration failed: {e}")))
    }

    fn decode(json: sqlx::types::JsonValue) -> Result<Property> {
        serde_json::from_value(json)
            .map_err(|e| PropertyStoreError::Storage(format!("Failed to deserialize property: {e}")))
    }
}

#[async_trait]
impl PropertyStore for PostgresPropertyStore {
    #[tracing::instrument(skip(self), fields(store = "properties"))]
    async fn find(&self, id: PropertyId) -> Result<Option<Property>> {
        let row: Option<(sqlx::types::JsonValue,)> =
            sqlx::query_as("SELECT data FROM properties WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(json,)| Self::decode(json)).transpose()
    }

    #[tracing::instrument(skip(self), fields(store = "properties"))]
    async fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Property>> {
        let rows: Vec<(sqlx::types::JsonValue,)> = sqlx::query_as(
            "SELECT data FROM properties
             WHERE owner_id = $1
             ORDER BY created_at ASC",
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|(json,)| Self::decode(json)).collect()
    }

    #[tracing::instrument(skip(self, property), fields(store = "properties", property_id = %property.id))]
    async fn insert(&self, property: Property) -> Result<()> {
        let json = serde_json::to_value(&property)
            .map_err(|e| PropertyStoreError::Storage(format!("Failed to serialize property: {e}")))?;

        let result = sqlx::query(
            "INSERT INTO properties (id, owner_id, data, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(property.id.as_uuid())
        .bind(property.owner_id.as_uuid())
        .bind(json)
        .bind(property.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PropertyStoreError::Duplicate(property.id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn property(owner_id: OwnerId, title: &str, age_days: i64) -> Property {
        Property {
            id: PropertyId::new(),
            owner_id,
            owner_email: "john@doe.com.br".to_string(),
            title: title.to_string(),
            description: "Um apartamento legal".to_string(),
            rooms: 3,
            bathrooms: 2,
            pets_allowed: true,
            daily_rate_cents: 10_000,
            property_type: "Apartamento".to_string(),
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn find_and_list_by_owner() {
        let store = InMemoryPropertyStore::new();
        let john = OwnerId::new();
        let jane = OwnerId::new();

        let newer = property(john, "Apartamento Novo", 1);
        let older = property(john, "Casa de Praia", 5);
        store.insert(newer.clone()).await.unwrap();
        store.insert(older.clone()).await.unwrap();
        store.insert(property(jane, "Apartamento Vintage", 2)).await.unwrap();

        assert_eq!(store.find(newer.id).await.unwrap(), Some(newer.clone()));
        assert_eq!(store.find(PropertyId::new()).await.unwrap(), None);

        let titles: Vec<String> = store
            .list_by_owner(john)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Casa de Praia", "Apartamento Novo"]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryPropertyStore::new();
        let listing = property(OwnerId::new(), "Apartamento Novo", 0);

        store.insert(listing.clone()).await.unwrap();
        assert!(matches!(
            store.insert(listing).await,
            Err(PropertyStoreError::Duplicate(_))
        ));
    }
}
