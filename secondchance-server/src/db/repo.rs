//! Item repository - the five operations behind the HTTP routes
//!
//! Each operation is one or two store calls:
//! - create: read max id, insert (not atomic, see below)
//! - update/delete: lookup for the 404, then write
//!
//! Id assignment is read-then-write. Two creates racing on the same max id
//! both get the same next id; nothing retries or rejects the second insert.

use chrono::Utc;
use serde_json::{Map, Value};

use super::store::ItemStore;
use crate::error::ItemError;
use crate::models::{Item, ItemPatch};

/// Result of an update whose target existed at lookup time
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The store returned the post-update document
    Updated(Item),
    /// The write matched nothing (item vanished between lookup and update)
    NotReturned,
}

/// Item repository
pub struct ItemRepo<'a> {
    store: &'a dyn ItemStore,
}

impl<'a> ItemRepo<'a> {
    pub fn new(store: &'a dyn ItemStore) -> Self {
        Self { store }
    }

    /// All items, unfiltered.
    pub async fn list(&self) -> Result<Vec<Item>, ItemError> {
        self.store.list().await
    }

    /// Insert a new listing built from client fields.
    ///
    /// The id is one more than the largest numeric id stored; an empty
    /// collection starts at "1". `file_path` is persisted in the same insert.
    pub async fn create(
        &self,
        fields: Map<String, Value>,
        file_path: Option<String>,
    ) -> Result<Item, ItemError> {
        let id = match self.store.max_id().await? {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ItemError::Internal("item id space exhausted".into()))?,
            None => 1,
        };

        let date_added = Utc::now().timestamp();
        let item = Item::new_listing(id.to_string(), date_added, fields, file_path)?;
        self.store.insert(&item).await?;

        tracing::info!(id = %item.id, has_file = item.file_path.is_some(), "created item");
        Ok(item)
    }

    /// Exact-match lookup on the string id.
    pub async fn get(&self, id: &str) -> Result<Item, ItemError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ItemError::not_found(id))
    }

    /// Lookup that must succeed before an update or delete.
    ///
    /// Runs ahead of any request-body parsing, so a missing id is a NotFound
    /// whatever the client sent.
    pub async fn find_existing(&self, id: &str) -> Result<Item, ItemError> {
        self.get(id).await.inspect_err(|e| {
            if e.is_not_found() {
                tracing::error!(id, "secondChanceItem not found");
            }
        })
    }

    /// Merge `patch` into the stored item and write it back.
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<UpdateOutcome, ItemError> {
        let item = self.find_existing(id).await?;
        self.apply_update(item, patch).await
    }

    /// Merge `patch` into an item already looked up and write the full document.
    pub async fn apply_update(
        &self,
        mut item: Item,
        patch: ItemPatch,
    ) -> Result<UpdateOutcome, ItemError> {
        item.apply_patch(patch, Utc::now());

        let outcome = match self.store.replace(&item).await? {
            Some(stored) => UpdateOutcome::Updated(stored),
            None => UpdateOutcome::NotReturned,
        };
        tracing::info!(
            id = %item.id,
            updated = matches!(outcome, UpdateOutcome::Updated(_)),
            "updated item"
        );
        Ok(outcome)
    }

    /// Remove the item. Lookup first so a missing id is a NotFound.
    pub async fn delete(&self, id: &str) -> Result<(), ItemError> {
        self.find_existing(id).await?;

        self.store.delete(id).await?;
        tracing::info!(id, "deleted item");
        Ok(())
    }
}
