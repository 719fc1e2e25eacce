use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    AdjustOutcome, ChangeType, NewProduct, Product, ProductChanges, ProductId, Quantity, Result,
    StockChange, StockChangeId, StoreError, store::InventoryStore,
};

#[derive(Default)]
struct InMemoryState {
    products: BTreeMap<ProductId, Product>,
    history: Vec<StockChange>,
    last_product_id: i64,
    last_change_id: i64,
    last_change_at: Option<DateTime<Utc>>,
}

/// In-memory inventory store implementation for testing.
///
/// All state sits behind one lock, so every operation is trivially atomic.
/// Adjustments of different products therefore serialize here; only the
/// Postgres store lets them proceed independently.
/// Ids are assigned sequentially starting at 1, like a fresh database.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of ledger entries across all products.
    pub async fn history_len(&self) -> usize {
        self.state.read().await.history.len()
    }

    /// Clears all products and ledger entries. Id sequences keep counting.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.products.clear();
        state.history.clear();
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;

        state.last_product_id += 1;
        let id = ProductId::new(state.last_product_id);
        let now = Utc::now();
        let product = Product {
            id,
            name: product.name,
            description: product.description,
            stock_quantity: product.stock_quantity,
            low_stock_threshold: product.low_stock_threshold,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(id, product.clone());

        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        let mut state = self.state.write().await;

        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(product);
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }

    async fn adjust_stock(
        &self,
        id: ProductId,
        change_type: ChangeType,
        quantity: Quantity,
    ) -> Result<AdjustOutcome> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        let Some(product) = state.products.get_mut(&id) else {
            return Ok(AdjustOutcome::NotFound);
        };

        let new_quantity = match change_type {
            ChangeType::Increase => product
                .stock_quantity
                .checked_add(quantity.get())
                .ok_or(StoreError::QuantityOverflow(id))?,
            ChangeType::Decrease if product.stock_quantity < quantity.get() => {
                return Ok(AdjustOutcome::InsufficientStock {
                    available: product.stock_quantity,
                });
            }
            ChangeType::Decrease => product.stock_quantity - quantity.get(),
        };

        // Ledger timestamps never run backwards, even if the wall clock does
        let now = Utc::now();
        let created_at = state.last_change_at.map_or(now, |last| last.max(now));
        state.last_change_at = Some(created_at);
        state.last_change_id += 1;

        product.stock_quantity = new_quantity;
        product.updated_at = created_at;
        state.history.push(StockChange {
            id: StockChangeId::new(state.last_change_id),
            product_id: id,
            change_type,
            quantity: quantity.get(),
            created_at,
        });

        Ok(AdjustOutcome::Applied(product.clone()))
    }

    async fn low_stock_products(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect())
    }

    async fn stock_history(&self, id: ProductId) -> Result<Vec<StockChange>> {
        let state = self.state.read().await;
        let mut changes: Vec<_> = state
            .history
            .iter()
            .filter(|c| c.product_id == id)
            .cloned()
            .collect();

        // Most recent first; id breaks timestamp ties
        changes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.cmp(&a.id))
        });

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, stock_quantity: i64, threshold: Option<i64>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            stock_quantity,
            low_stock_threshold: threshold,
        }
    }

    fn qty(value: i64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryInventoryStore::new();

        let a = store.insert_product(new_product("A", 1, None)).await.unwrap();
        let b = store.insert_product(new_product("B", 2, None)).await.unwrap();

        assert_eq!(a.id, ProductId::new(1));
        assert_eq!(b.id, ProductId::new(2));
        assert_eq!(store.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn increase_appends_ledger_entry() {
        let store = InMemoryInventoryStore::new();
        let product = store.insert_product(new_product("A", 5, None)).await.unwrap();

        let outcome = store
            .adjust_stock(product.id, ChangeType::Increase, qty(3))
            .await
            .unwrap();

        let updated = match outcome {
            AdjustOutcome::Applied(product) => product,
            other => panic!("expected applied outcome, got {other:?}"),
        };
        assert_eq!(updated.stock_quantity, 8);

        let history = store.stock_history(product.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].change_type, ChangeType::Increase);
        assert_eq!(history[0].quantity, 3);
    }

    #[tokio::test]
    async fn decrease_below_zero_writes_nothing() {
        let store = InMemoryInventoryStore::new();
        let product = store.insert_product(new_product("A", 2, None)).await.unwrap();

        let outcome = store
            .adjust_stock(product.id, ChangeType::Decrease, qty(3))
            .await
            .unwrap();

        assert_eq!(outcome, AdjustOutcome::InsufficientStock { available: 2 });
        assert_eq!(store.history_len().await, 0);
        let current = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(current.stock_quantity, 2);
    }

    #[tokio::test]
    async fn adjust_unknown_product_is_not_found() {
        let store = InMemoryInventoryStore::new();

        let outcome = store
            .adjust_stock(ProductId::new(99), ChangeType::Increase, qty(1))
            .await
            .unwrap();

        assert_eq!(outcome, AdjustOutcome::NotFound);
        assert_eq!(store.history_len().await, 0);
    }

    #[tokio::test]
    async fn history_is_most_recent_first() {
        let store = InMemoryInventoryStore::new();
        let product = store.insert_product(new_product("A", 10, None)).await.unwrap();

        store
            .adjust_stock(product.id, ChangeType::Increase, qty(1))
            .await
            .unwrap();
        store
            .adjust_stock(product.id, ChangeType::Decrease, qty(2))
            .await
            .unwrap();
        store
            .adjust_stock(product.id, ChangeType::Increase, qty(3))
            .await
            .unwrap();

        let quantities: Vec<i64> = store
            .stock_history(product.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.quantity)
            .collect();
        assert_eq!(quantities, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn increase_past_i64_max_is_rejected() {
        let store = InMemoryInventoryStore::new();
        let product = store
            .insert_product(new_product("A", i64::MAX, None))
            .await
            .unwrap();

        let result = store
            .adjust_stock(product.id, ChangeType::Increase, qty(1))
            .await;

        assert!(matches!(result, Err(StoreError::QuantityOverflow(_))));
        assert_eq!(store.history_len().await, 0);
    }

    #[tokio::test]
    async fn delete_keeps_history() {
        let store = InMemoryInventoryStore::new();
        let product = store.insert_product(new_product("A", 10, None)).await.unwrap();
        store
            .adjust_stock(product.id, ChangeType::Decrease, qty(4))
            .await
            .unwrap();

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(!store.delete_product(product.id).await.unwrap());
        assert!(store.get_product(product.id).await.unwrap().is_none());
        assert_eq!(store.stock_history(product.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_product_returns_none() {
        let store = InMemoryInventoryStore::new();
        let result = store
            .update_product(ProductId::new(1), ProductChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn low_stock_filters_by_threshold() {
        let store = InMemoryInventoryStore::new();
        store.insert_product(new_product("Low", 5, Some(10))).await.unwrap();
        store.insert_product(new_product("Edge", 10, Some(10))).await.unwrap();
        store.insert_product(new_product("Plenty", 50, Some(10))).await.unwrap();
        store.insert_product(new_product("Untracked", 0, None)).await.unwrap();

        let names: Vec<String> = store
            .low_stock_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Low", "Edge"]);
    }

    #[tokio::test]
    async fn clear_keeps_id_sequence() {
        let store = InMemoryInventoryStore::new();
        store.insert_product(new_product("A", 1, None)).await.unwrap();
        store.clear().await;

        let b = store.insert_product(new_product("B", 1, None)).await.unwrap();
        assert_eq!(b.id, ProductId::new(2));
        assert!(store.get_product(ProductId::new(1)).await.unwrap().is_none());
    }
}
