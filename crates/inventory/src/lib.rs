//! Inventory rules on top of the inventory store.
//!
//! This crate provides:
//! - `ProductRepository` for validated CRUD over the catalog
//! - `StockService`, which applies increases and decreases without ever
//!   letting stock go negative and records each change in the ledger
//! - `InventoryQueries` for the low-stock listing and per-product history
//!
//! Every component takes its store at construction. Nothing here logs;
//! errors are returned to the caller.

pub mod error;
pub mod product;
pub mod queries;
pub mod stock;

pub use error::InventoryError;
pub use inventory_store::{ChangeType, Product, ProductId, StockChange};
pub use product::{CreateProduct, ProductRepository, UpdateProduct};
pub use queries::InventoryQueries;
pub use stock::StockService;
