//! HTTP server command
//!
//! Runs the second-chance items API, backed by Postgres or, with
//! `--in-memory`, by a throwaway in-process store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use secondchance_server::upload::DEFAULT_UPLOAD_DIR;
use secondchance_server::{
    run_server, Connector, ItemStore, MemoryItemStore, PgItemStore, ServerConfig,
};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "SECONDCHANCE_BIND", default_value = "127.0.0.1:3060")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Keep items in memory instead of Postgres; everything is lost on exit
    #[arg(long)]
    pub in_memory: bool,

    /// Directory uploaded images are written to and served from
    #[arg(long, env = "SECONDCHANCE_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "SECONDCHANCE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Maximum request body size in bytes (bounds image uploads)
    #[arg(long, env = "SECONDCHANCE_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store: Arc<dyn ItemStore> = if args.in_memory {
        tracing::warn!("Using in-memory item store - items are lost on shutdown");
        Arc::new(MemoryItemStore::new())
    } else {
        // Connect and bootstrap the schema up front so a bad URL fails at startup
        let store = PgItemStore::new(Connector::new(args.database.store_config()?));
        store
            .migrate()
            .await
            .context("Failed to prepare item store")?;
        Arc::new(store)
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        upload_dir: args.upload_dir,
        request_timeout: Duration::from_secs(args.timeout),
        max_upload_bytes: args.max_upload_bytes,
    };

    tracing::info!("Starting secondchance server on {}", args.bind);

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
