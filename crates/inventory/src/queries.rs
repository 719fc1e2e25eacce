//! Read-side views over the catalog and the stock ledger.

use inventory_store::{InventoryStore, Product, ProductId, StockChange};

use crate::error::InventoryError;

/// Read-only inventory queries.
pub struct InventoryQueries<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> InventoryQueries<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Products whose stock is at or below their threshold.
    ///
    /// Products without a threshold never appear.
    pub async fn low_stock(&self) -> Result<Vec<Product>, InventoryError> {
        Ok(self.store.low_stock_products().await?)
    }

    /// Ledger entries for a product, most recent first.
    ///
    /// Returns an empty list for products with no history, including ones
    /// that never existed.
    pub async fn history(&self, id: ProductId) -> Result<Vec<StockChange>, InventoryError> {
        Ok(self.store.stock_history(id).await?)
    }
}
