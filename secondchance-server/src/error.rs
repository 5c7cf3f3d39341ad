//! Error types for the item store and repository

use thiserror::Error;

use crate::models::ValidationError;

pub type Result<T, E = ItemError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ItemError {
    /// The store could not be reached on first use.
    #[error("failed to connect to item store: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("secondChanceItem '{id}' not found")]
    NotFound { id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ItemError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_owned() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
