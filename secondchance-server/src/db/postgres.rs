//! Postgres item store
//!
//! Each item is one JSONB document in `second_chance_items.doc`. Lookups
//! match on `doc->>'id'`; when ids collide, the earliest row wins, like a
//! find-one against a document collection.

use async_trait::async_trait;
use sqlx::types::Json;

use super::connector::Connector;
use super::migrations;
use super::store::ItemStore;
use crate::error::ItemError;
use crate::models::Item;

/// Item store backed by the shared connector
pub struct PgItemStore {
    connector: Connector,
}

impl PgItemStore {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Create the collection if needed. Connects if nothing has yet.
    pub async fn migrate(&self) -> Result<(), ItemError> {
        let pool = self.connector.connection().await?;
        migrations::run(pool).await
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), ItemError> {
        let pool = self.connector.connection().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        let pool = self.connector.connection().await?;
        let rows: Vec<(Json<Item>,)> =
            sqlx::query_as("SELECT doc FROM second_chance_items ORDER BY seq")
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(Json(item),)| item).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ItemError> {
        let pool = self.connector.connection().await?;
        let row: Option<(Json<Item>,)> = sqlx::query_as(
            r#"
            SELECT doc FROM second_chance_items
            WHERE doc->>'id' = $1
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(Json(item),)| item))
    }

    async fn max_id(&self) -> Result<Option<u64>, ItemError> {
        let pool = self.connector.connection().await?;
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT doc->>'id' FROM second_chance_items
            WHERE doc->>'id' ~ '^[0-9]+$'
            ORDER BY (doc->>'id')::numeric DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        row.map(|(raw,)| {
            raw.parse::<u64>()
                .map_err(|_| ItemError::Internal(format!("item id '{}' is out of range", raw)))
        })
        .transpose()
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemError> {
        let pool = self.connector.connection().await?;
        sqlx::query("INSERT INTO second_chance_items (doc) VALUES ($1)")
            .bind(Json(item))
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn replace(&self, item: &Item) -> Result<Option<Item>, ItemError> {
        let pool = self.connector.connection().await?;
        let row: Option<(Json<Item>,)> = sqlx::query_as(
            r#"
            UPDATE second_chance_items SET doc = $2
            WHERE seq = (
                SELECT seq FROM second_chance_items
                WHERE doc->>'id' = $1
                ORDER BY seq
                LIMIT 1
            )
            RETURNING doc
            "#,
        )
        .bind(&item.id)
        .bind(Json(item))
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(Json(item),)| item))
    }

    async fn delete(&self, id: &str) -> Result<u64, ItemError> {
        let pool = self.connector.connection().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM second_chance_items
            WHERE seq = (
                SELECT seq FROM second_chance_items
                WHERE doc->>'id' = $1
                ORDER BY seq
                LIMIT 1
            )
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
