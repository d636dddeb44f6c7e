//! SQLite implementation of EventStore.
//!
//! Persists visitor events to a single `visitors` table. Timestamps are
//! generated by SQLite (`datetime('now')`) inside the insert, so the store
//! alone decides event time.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::visitor::VisitorEvent;
use crate::ports::{EventStore, StoreError};

const CREATE_VISITORS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS visitors (
        count INTEGER NOT NULL,
        time TEXT NOT NULL
    )
"#;

/// SQLite-backed visitor log.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Creates a store for the configured database without touching it.
    ///
    /// The pool connects lazily; call [`EventStore::initialize`] (or use
    /// [`SqliteEventStore::connect`]) before serving.
    pub fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let connect_options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::init(format!("invalid database URL: {}", e)))?
            .create_if_missing(true);

        // Each SQLite memory connection owns its own database, so an
        // in-memory log must live on exactly one connection that is never
        // recycled.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(connect_options);

        Ok(Self { pool })
    }

    /// Creates the store and initializes its schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let store = Self::new(config)?;
        store.initialize().await?;
        Ok(store)
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_VISITORS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::init(format!("failed to create visitors table: {}", e)))?;

        Ok(())
    }

    async fn append(&self, count: u64) -> Result<VisitorEvent, StoreError> {
        let count = i64::try_from(count)
            .map_err(|_| StoreError::write(format!("count {} exceeds INTEGER range", count)))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::write(format!("failed to begin transaction: {}", e)))?;

        let (stored_count, time): (i64, String) = sqlx::query_as(
            r#"
            INSERT INTO visitors (count, time)
            VALUES ($1, datetime('now'))
            RETURNING count, time
            "#,
        )
        .bind(count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::write(format!("failed to insert visitor event: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::write(format!("failed to commit visitor event: {}", e)))?;

        let stored_count = u64::try_from(stored_count)
            .map_err(|_| StoreError::write(format!("stored negative count {}", stored_count)))?;

        Ok(VisitorEvent::new(stored_count, time))
    }

    async fn read_all(&self) -> Result<Vec<VisitorEvent>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT count, time FROM visitors ORDER BY rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::read(format!("failed to scan visitors: {}", e)))?;

        rows.into_iter()
            .map(|(count, time)| {
                u64::try_from(count)
                    .map(|count| VisitorEvent::new(count, time))
                    .map_err(|_| StoreError::read(format!("negative count {} in visitors", count)))
            })
            .collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
