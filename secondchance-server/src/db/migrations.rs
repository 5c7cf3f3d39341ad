//! Schema bootstrap for the item collection

use sqlx::PgPool;

use crate::Result;

/// Create the item collection (one JSONB document per row) if it doesn't exist
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running item store migrations...");

    // `seq` gives the collection a stable insertion order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS second_chance_items (
            seq BIGSERIAL PRIMARY KEY,
            doc JSONB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_second_chance_items_id
        ON second_chance_items ((doc->>'id'))
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Item store migrations complete");
    Ok(())
}
