//! In-memory item store
//!
//! Same semantics as the Postgres store, held in a `Vec` behind an RwLock.
//! Used by tests and by `serve --in-memory`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::ItemStore;
use crate::error::ItemError;
use crate::models::Item;

#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), ItemError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ItemError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn max_id(&self) -> Result<Option<u64>, ItemError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| !item.id.is_empty() && item.id.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max())
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemError> {
        self.items.write().await.push(item.clone());
        Ok(())
    }

    async fn replace(&self, item: &Item) -> Result<Option<Item>, ItemError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<u64, ItemError> {
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
