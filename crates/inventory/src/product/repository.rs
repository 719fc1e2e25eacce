//! Catalog CRUD over an injected store.

use inventory_store::{InventoryStore, Product, ProductId};

use super::{CreateProduct, UpdateProduct};
use crate::error::InventoryError;

/// Validated create, read, update and delete of products.
pub struct ProductRepository<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ProductRepository<S> {
    /// Creates a repository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a product and returns it with its generated id.
    pub async fn create(&self, cmd: CreateProduct) -> Result<Product, InventoryError> {
        let product = cmd.validate()?;
        Ok(self.store.insert_product(product).await?)
    }

    /// Loads a product by id.
    ///
    /// A missing product is `Ok(None)`, not an error.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, InventoryError> {
        Ok(self.store.get_product(id).await?)
    }

    /// Replaces the supplied fields of a product and returns the result.
    pub async fn update(
        &self,
        id: ProductId,
        cmd: UpdateProduct,
    ) -> Result<Product, InventoryError> {
        let changes = cmd.validate()?;
        self.store
            .update_product(id, changes)
            .await?
            .ok_or(InventoryError::NotFound(id))
    }

    /// Deletes a product. Deleting a product that doesn't exist is `NotFound`.
    pub async fn delete(&self, id: ProductId) -> Result<(), InventoryError> {
        if self.store.delete_product(id).await? {
            Ok(())
        } else {
            Err(InventoryError::NotFound(id))
        }
    }

    /// Returns every product.
    pub async fn list_all(&self) -> Result<Vec<Product>, InventoryError> {
        Ok(self.store.list_products().await?)
    }
}
