//! Subcommand implementations

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use clap::Args;
use secondchance_server::db::connector::DEFAULT_MAX_CONNECTIONS;
use secondchance_server::StoreConfig;

/// Postgres connection options shared by every command that touches the store
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Database URL (also read from DATABASE_URL or a .env file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "SECONDCHANCE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub fn store_config(&self) -> Result<StoreConfig> {
        let database_url = self
            .database_url
            .clone()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        Ok(StoreConfig {
            database_url,
            max_connections: self.max_connections,
        })
    }
}
