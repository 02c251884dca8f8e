//! Product types.
//!
//! A [`ProductInput`] carries the mutable fields and has no identifier; the
//! store turns it into a [`Product`] by assigning one. An identifier is never
//! present on an unsaved product and never changes once assigned.

use serde::{Deserialize, Serialize};

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Field values for creating or overwriting a product.
///
/// Unknown JSON fields (including `id`) are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
        }
    }

    /// Attach a store-assigned identifier.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
        }
    }
}

impl Product {
    /// Overwrite the mutable fields, keeping the identifier.
    pub fn apply(&mut self, changes: ProductInput) {
        self.name = changes.name;
        self.price = changes.price;
        self.description = changes.description;
    }
}
