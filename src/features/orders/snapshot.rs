use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::models::CartLine;

/// One order line as frozen at checkout
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Order lines and total computed from the cart at submission time
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub items: Vec<SnapshotItem>,
    pub total: Decimal,
}

impl OrderSnapshot {
    /// Freeze the cart's lines at their current prices. An empty cart yields no order.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self> {
        if lines.is_empty() {
            return Err(AppError::BadRequest("Your cart is empty".to_string()));
        }

        let items = lines
            .iter()
            .map(|line| SnapshotItem {
                product_id: line.product_id,
                product_name: line.name.clone(),
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        Ok(Self {
            items,
            total: lines.iter().map(CartLine::subtotal).sum(),
        })
    }

    /// Stock decrements ordered by product id so concurrent checkouts lock rows in the same order
    pub fn stock_decrements(&self) -> Vec<(Uuid, i32, &str)> {
        let mut decrements: Vec<(Uuid, i32, &str)> = self
            .items
            .iter()
            .map(|i| (i.product_id, i.quantity, i.product_name.as_str()))
            .collect();
        decrements.sort_by_key(|(id, _, _)| *id);
        decrements
    }
}
