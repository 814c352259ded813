//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{MessageStore, StoredRecord};
use crate::config::RelayConfig;
use crate::error::RelayError;

/// PostgreSQL-backed message store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the database settings in `config`.
    ///
    /// The first connection is established eagerly, so an unreachable
    /// database fails here rather than on the first insert.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] if no connection can be
    /// established within the configured timeout.
    pub async fn connect(config: &RelayConfig) -> Result<Self, RelayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(config.database_connect_timeout())
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] if a migration fails.
    pub async fn run_migrations(&self) -> Result<(), RelayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RelayError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl MessageStore for PostgresStore {
    async fn insert(&self, record: &StoredRecord) -> Result<(), RelayError> {
        // Bound as text: a jsonb-typed parameter would reject `\u0000`.
        sqlx::query(
            "INSERT INTO messages (id, content, created_at) VALUES ($1, CAST($2 AS JSON), $3)",
        )
        .bind(record.id)
        .bind(record.content.to_string())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RelayError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
