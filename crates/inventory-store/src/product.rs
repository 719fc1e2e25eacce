use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// A product row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-generated key, immutable after creation.
    pub id: ProductId,

    pub name: String,

    pub description: Option<String>,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    /// Products at or below this level are reported as low stock.
    /// `None` opts the product out of low-stock reporting.
    pub low_stock_threshold: Option<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns true if the product has a threshold and is at or below it.
    pub fn is_low_stock(&self) -> bool {
        self.low_stock_threshold
            .is_some_and(|threshold| self.stock_quantity <= threshold)
    }
}

/// Values for a product that has not been inserted yet.
///
/// The store trusts these values; validation happens before a `NewProduct`
/// is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub stock_quantity: i64,
    pub low_stock_threshold: Option<i64>,
}

/// A set of field replacements for an existing product.
///
/// `None` leaves the stored value untouched. For the nullable columns the
/// inner `Option` is the replacement value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<Option<i64>>,
}

impl ProductChanges {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.stock_quantity.is_none()
            && self.low_stock_threshold.is_none()
    }

    /// Writes the supplied fields onto `product`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(threshold) = self.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }
    }
}

/// The magnitude of a stock adjustment. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Returns `None` for zero or negative values.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
