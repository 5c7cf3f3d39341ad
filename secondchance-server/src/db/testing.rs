//! Store wrappers that force the awkward interleavings real backends only
//! hit under load: an item vanishing between lookup and write, two creates
//! reading the same max id, a backend that stops answering.

use async_trait::async_trait;
use tokio::sync::Barrier;

use super::memory::MemoryItemStore;
use super::store::ItemStore;
use crate::error::ItemError;
use crate::models::Item;

/// Finds items normally, but every replace matches nothing.
#[derive(Default)]
pub struct VanishingStore {
    inner: MemoryItemStore,
}

#[async_trait]
impl ItemStore for VanishingStore {
    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    async fn ping(&self) -> Result<(), ItemError> {
        self.inner.ping().await
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        self.inner.list().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ItemError> {
        self.inner.find_by_id(id).await
    }

    async fn max_id(&self) -> Result<Option<u64>, ItemError> {
        self.inner.max_id().await
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemError> {
        self.inner.insert(item).await
    }

    async fn replace(&self, _item: &Item) -> Result<Option<Item>, ItemError> {
        Ok(None)
    }

    async fn delete(&self, id: &str) -> Result<u64, ItemError> {
        self.inner.delete(id).await
    }
}

/// Holds every `max_id` reader until `parties` of them have read.
pub struct GatedStore {
    inner: MemoryItemStore,
    gate: Barrier,
}

impl GatedStore {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: MemoryItemStore::new(),
            gate: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl ItemStore for GatedStore {
    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    async fn ping(&self) -> Result<(), ItemError> {
        self.inner.ping().await
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        self.inner.list().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ItemError> {
        self.inner.find_by_id(id).await
    }

    async fn max_id(&self) -> Result<Option<u64>, ItemError> {
        let max = self.inner.max_id().await?;
        self.gate.wait().await;
        Ok(max)
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemError> {
        self.inner.insert(item).await
    }

    async fn replace(&self, item: &Item) -> Result<Option<Item>, ItemError> {
        self.inner.replace(item).await
    }

    async fn delete(&self, id: &str) -> Result<u64, ItemError> {
        self.inner.delete(id).await
    }
}

/// Backend that is down: ping and every query fail.
pub struct UnreachableStore;

fn down() -> ItemError {
    ItemError::Internal("store unreachable".into())
}

#[async_trait]
impl ItemStore for UnreachableStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), ItemError> {
        Err(down())
    }

    async fn list(&self) -> Result<Vec<Item>, ItemError> {
        Err(down())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Item>, ItemError> {
        Err(down())
    }

    async fn max_id(&self) -> Result<Option<u64>, ItemError> {
        Err(down())
    }

    async fn insert(&self, _item: &Item) -> Result<(), ItemError> {
        Err(down())
    }

    async fn replace(&self, _item: &Item) -> Result<Option<Item>, ItemError> {
        Err(down())
    }

    async fn delete(&self, _id: &str) -> Result<u64, ItemError> {
        Err(down())
    }
}
