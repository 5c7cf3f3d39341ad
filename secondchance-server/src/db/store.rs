//! Item store trait
//!
//! The repository talks to storage only through this trait so the same
//! operations run against Postgres in production and memory in tests.

use async_trait::async_trait;

use crate::error::ItemError;
use crate::models::Item;

#[async_trait]
pub trait ItemStore: Send + Sync + 'static {
    /// Short backend name reported by `/health`.
    fn kind(&self) -> &'static str;

    /// Cheap round trip proving the backend is reachable.
    async fn ping(&self) -> Result<(), ItemError>;

    /// Every item, in insertion order.
    async fn list(&self) -> Result<Vec<Item>, ItemError>;

    /// First item whose `id` equals `id` exactly.
    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ItemError>;

    /// Largest decimal-integer `id` currently stored. Non-numeric ids are ignored.
    async fn max_id(&self) -> Result<Option<u64>, ItemError>;

    async fn insert(&self, item: &Item) -> Result<(), ItemError>;

    /// Overwrite the first item with `item.id`, returning the stored post-state.
    ///
    /// `None` means nothing matched at write time.
    async fn replace(&self, item: &Item) -> Result<Option<Item>, ItemError>;

    /// Remove the first item with this id. Returns the number removed.
    async fn delete(&self, id: &str) -> Result<u64, ItemError>;
}
