use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Product, ProductId, StockChangeId};

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
}

impl ChangeType {
    /// Returns the value stored in the `change_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Increase => "increase",
            ChangeType::Decrease => "decrease",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(ChangeType::Increase),
            "decrease" => Ok(ChangeType::Decrease),
            other => Err(format!("unknown change type: {other}")),
        }
    }
}

/// One entry in the append-only stock ledger.
///
/// Written exactly once per applied adjustment and never modified. The
/// `product_id` is a plain reference; entries remain after the product is
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub id: StockChangeId,
    pub product_id: ProductId,
    pub change_type: ChangeType,
    /// Magnitude of the change, always greater than zero.
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of an atomic stock adjustment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The quantity was changed and a ledger entry appended.
    Applied(Product),
    /// No product with the given id exists. Nothing was written.
    NotFound,
    /// A decrease asked for more than is on hand. Nothing was written.
    InsufficientStock { available: i64 },
}
