//! Stock adjustment: increases and decreases paired with ledger entries.

use inventory_store::{
    AdjustOutcome, ChangeType, InventoryStore, Product, ProductId, Quantity, StoreError,
};

use crate::error::InventoryError;

/// Applies stock changes to products.
///
/// The store performs the non-negative check, the quantity write and the
/// ledger append as one atomic unit, so two concurrent decreases of the same
/// product can never both succeed past zero. Adjustments of different
/// products don't contend.
pub struct StockService<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> StockService<S> {
    /// Creates a stock service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds `quantity` units to a product and records an `increase` entry.
    pub async fn increase(&self, id: ProductId, quantity: i64) -> Result<Product, InventoryError> {
        self.adjust(id, ChangeType::Increase, quantity).await
    }

    /// Removes `quantity` units from a product and records a `decrease` entry.
    ///
    /// Taking stock to exactly zero is allowed; going below zero fails with
    /// `InsufficientStock` and changes nothing.
    pub async fn decrease(&self, id: ProductId, quantity: i64) -> Result<Product, InventoryError> {
        self.adjust(id, ChangeType::Decrease, quantity).await
    }

    async fn adjust(
        &self,
        id: ProductId,
        change_type: ChangeType,
        quantity: i64,
    ) -> Result<Product, InventoryError> {
        let amount = Quantity::new(quantity)
            .ok_or_else(|| InventoryError::invalid("quantity must be a positive integer"))?;

        let outcome = match self.store.adjust_stock(id, change_type, amount).await {
            Err(StoreError::QuantityOverflow(_)) => {
                return Err(InventoryError::invalid(
                    "quantity too large: stock would exceed the maximum",
                ));
            }
            result => result?,
        };

        match outcome {
            AdjustOutcome::Applied(product) => Ok(product),
            AdjustOutcome::NotFound => Err(InventoryError::NotFound(id)),
            AdjustOutcome::InsufficientStock { available } => {
                Err(InventoryError::InsufficientStock {
                    product_id: id,
                    requested: quantity,
                    available,
                })
            }
        }
    }
}
