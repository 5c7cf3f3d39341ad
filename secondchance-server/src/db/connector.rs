//! Storage connector - lazily created, process-wide PgPool
//!
//! The first call to [`Connector::connection`] connects; every later call
//! returns the same pool. A failed connect is returned to the caller and
//! not cached, so the next call tries again.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::error::ItemError;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Owns the single connection pool for the process
pub struct Connector {
    config: StoreConfig,
    pool: OnceCell<PgPool>,
}

impl Connector {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Get the shared pool, connecting on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::Connection`] if the first connect fails.
    pub async fn connection(&self) -> Result<&PgPool, ItemError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::info!(
                    max_connections = self.config.max_connections,
                    "connecting to item store"
                );
                PgPoolOptions::new()
                    .max_connections(self.config.max_connections)
                    .connect(&self.config.database_url)
                    .await
                    .map_err(ItemError::Connection)
            })
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }
}
