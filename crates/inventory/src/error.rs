//! Inventory error types.

use inventory_store::{ProductId, StoreError};
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input was missing or out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// A decrease asked for more units than are on hand.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The store failed. Not retried here.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl InventoryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        InventoryError::InvalidArgument(message.into())
    }
}
