//! Create the item collection without starting the server

use anyhow::{Context, Result};
use clap::Parser;

use secondchance_server::{Connector, PgItemStore};

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let store = PgItemStore::new(Connector::new(args.database.store_config()?));
    store.migrate().await.context("Migration failed")?;

    tracing::info!("Item store is ready");
    Ok(())
}
