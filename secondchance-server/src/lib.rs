//! secondchance-server: HTTP API for second-chance item listings
//!
//! Exposes list/create/get/update/delete over a single collection of
//! donated-goods listings, stored as JSON documents, with an optional
//! image upload on create.

pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod upload;

pub use db::{Connector, ItemRepo, ItemStore, MemoryItemStore, PgItemStore, StoreConfig};
pub use error::{ItemError, Result};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use models::{Item, ItemPatch};
pub use upload::UploadDir;
