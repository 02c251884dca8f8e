//! SQLite storage layer for Catalog.
//!
//! Provides:
//! - Schema initialization
//! - The [`ProductRepository`] abstraction the service layer depends on
//! - A pooled SQLite implementation of it

pub mod schema;
pub mod sqlite;

use thiserror::Error;

use crate::model::{Product, ProductInput};

pub use sqlite::SqliteProductRepository;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to get pooled connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Create/read/update/delete access to persisted products.
///
/// Absence is never an error: lookups return `None` and deletes return
/// `false` when no row matches.
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id.
    fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Persist a new product and return it with its assigned id.
    fn insert(&self, input: &ProductInput) -> Result<Product, StoreError>;

    /// Persist several new products in one transaction.
    fn insert_all(&self, inputs: &[ProductInput]) -> Result<Vec<Product>, StoreError>;

    /// Overwrite the mutable fields of an existing product.
    ///
    /// Returns `None` and leaves the store untouched if `id` is unknown.
    fn update(&self, id: i64, changes: &ProductInput) -> Result<Option<Product>, StoreError>;

    /// Remove a product. Returns whether a row was deleted.
    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
