//! Database layer - connector, item stores, and the repository
//!
//! # Design Principles
//!
//! - One pool per process, created on first use and shared by every request
//! - Items are JSON documents; the store does no field-level validation
//! - Id assignment reads the current max then inserts (no compare-and-swap)

pub mod connector;
pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod repo;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use connector::{Connector, StoreConfig};
pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;
pub use repo::{ItemRepo, UpdateOutcome};
pub use store::ItemStore;
