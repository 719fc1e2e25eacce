use async_trait::async_trait;

use crate::{
    AdjustOutcome, ChangeType, NewProduct, Product, ProductChanges, ProductId, Quantity, Result,
    StockChange,
};

/// Core trait for inventory persistence.
///
/// Implementations own the product table and the stock ledger. Each method is
/// a single logical unit: it either completes or leaves the store unchanged.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Returns every product, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Returns the product with the given id, or None if it doesn't exist.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Inserts a product and returns it with its generated id.
    async fn insert_product(&self, product: NewProduct) -> Result<Product>;

    /// Applies `changes` to an existing product.
    ///
    /// The read and the write happen under a lock on the row, so a
    /// concurrent adjustment cannot be lost. Returns None if the product
    /// doesn't exist.
    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>>;

    /// Deletes a product. Returns true if a row was removed.
    ///
    /// Ledger entries for the product are left in place.
    async fn delete_product(&self, id: ProductId) -> Result<bool>;

    /// Adjusts a product's stock and appends the matching ledger entry.
    ///
    /// The non-negative check, the quantity write and the ledger append
    /// happen atomically with respect to other adjustments of the same
    /// product. On any outcome other than `Applied` nothing is written.
    async fn adjust_stock(
        &self,
        id: ProductId,
        change_type: ChangeType,
        quantity: Quantity,
    ) -> Result<AdjustOutcome>;

    /// Returns products that have a threshold and are at or below it,
    /// ordered by id.
    async fn low_stock_products(&self) -> Result<Vec<Product>>;

    /// Returns the ledger entries of a product, most recent first.
    ///
    /// Unknown products yield an empty list.
    async fn stock_history(&self, id: ProductId) -> Result<Vec<StockChange>>;
}
