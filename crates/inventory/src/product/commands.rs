//! Product commands - inputs to the catalog, validated before they reach the store.

use inventory_store::{NewProduct, ProductChanges};

use crate::error::InventoryError;

/// Command to create a new product.
///
/// `name` and `stock_quantity` are optional here so that a request missing
/// either one is rejected by validation rather than by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}

impl CreateProduct {
    /// Creates a command with the two required fields set.
    pub fn new(name: impl Into<String>, stock_quantity: i64) -> Self {
        Self {
            name: Some(name.into()),
            stock_quantity: Some(stock_quantity),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = Some(threshold);
        self
    }

    /// Checks the command and turns it into an insertable record.
    pub fn validate(self) -> Result<NewProduct, InventoryError> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(InventoryError::invalid(
                    "name and stock quantity are required",
                ));
            }
        };
        let Some(stock_quantity) = self.stock_quantity else {
            return Err(InventoryError::invalid(
                "name and stock quantity are required",
            ));
        };
        check_stock_quantity(stock_quantity)?;
        if let Some(threshold) = self.low_stock_threshold {
            check_threshold(threshold)?;
        }

        Ok(NewProduct {
            name,
            description: self.description,
            stock_quantity,
            low_stock_threshold: self.low_stock_threshold,
        })
    }
}

/// Command to replace fields of an existing product.
///
/// Fields left as `None` keep their stored value. For `description` and
/// `low_stock_threshold` an inner `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<Option<i64>>,
}

impl UpdateProduct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i64) -> Self {
        self.stock_quantity = Some(stock_quantity);
        self
    }

    pub fn low_stock_threshold(mut self, threshold: Option<i64>) -> Self {
        self.low_stock_threshold = Some(threshold);
        self
    }

    /// Checks the supplied fields and turns them into a change set.
    pub fn validate(self) -> Result<ProductChanges, InventoryError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(InventoryError::invalid("name cannot be empty"));
        }
        if let Some(stock_quantity) = self.stock_quantity {
            check_stock_quantity(stock_quantity)?;
        }
        if let Some(Some(threshold)) = self.low_stock_threshold {
            check_threshold(threshold)?;
        }

        Ok(ProductChanges {
            name: self.name,
            description: self.description,
            stock_quantity: self.stock_quantity,
            low_stock_threshold: self.low_stock_threshold,
        })
    }
}

fn check_stock_quantity(stock_quantity: i64) -> Result<(), InventoryError> {
    if stock_quantity < 0 {
        return Err(InventoryError::invalid("stock quantity cannot be negative"));
    }
    Ok(())
}

fn check_threshold(threshold: i64) -> Result<(), InventoryError> {
    if threshold < 0 {
        return Err(InventoryError::invalid(
            "low stock threshold cannot be negative",
        ));
    }
    Ok(())
}
