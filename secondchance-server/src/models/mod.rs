//! Domain models
//!
//! - Item: the stored listing document
//! - ItemPatch: partial update input
//! - ValidationError: input errors surfaced as 400

mod item;
mod validation;

pub use item::{age_in_years, Item, ItemPatch};
pub use validation::ValidationError;
