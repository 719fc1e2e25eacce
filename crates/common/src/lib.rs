pub mod types;

pub use types::{ProductId, StockChangeId};
