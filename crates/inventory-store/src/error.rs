use thiserror::Error;

use crate::ProductId;

/// Errors that can occur when interacting with the inventory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An increase would push the stock quantity past what the column holds.
    #[error("Stock quantity overflow for product {0}")]
    QuantityOverflow(ProductId),

    /// A stored row held a value the store does not understand.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Result type for inventory store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
