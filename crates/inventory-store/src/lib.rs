pub mod error;
pub mod ledger;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod store;

pub use common::{ProductId, StockChangeId};
pub use error::{Result, StoreError};
pub use ledger::{AdjustOutcome, ChangeType, StockChange};
pub use memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use product::{NewProduct, Product, ProductChanges, Quantity};
pub use store::InventoryStore;
