use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::cart::models::CartLine;
use crate::shared::constants::MAX_LINE_QUANTITY;

/// One line of a cart with its subtotal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLineDto {
    pub product_id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "10.99")]
    pub price: Decimal,
    pub image_filename: String,
    pub stock: i32,
    pub quantity: i32,
    #[schema(value_type = String, example = "21.98")]
    pub subtotal: Decimal,
}

impl From<&CartLine> for CartLineDto {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: line.price,
            image_filename: line.image_filename.clone(),
            stock: line.stock,
            quantity: line.quantity,
            subtotal: line.subtotal(),
        }
    }
}

/// Cart contents; totals are derived from the lines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartViewDto {
    pub items: Vec<CartLineDto>,
    /// Sum of quantities
    pub item_count: i64,
    #[schema(value_type = String, example = "47.97")]
    pub total: Decimal,
}

impl CartViewDto {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.iter().map(CartLineDto::from).collect(),
            item_count: lines.iter().map(|l| i64::from(l.quantity)).sum(),
            total: lines.iter().map(CartLine::subtotal).sum(),
        }
    }

    pub fn empty() -> Self {
        Self::from_lines(&[])
    }
}

/// Guest cart contents plus the token to send on the next request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuestCartResponseDto {
    pub cart: CartViewDto,
    /// Absent once the cart is empty; the client should drop its token
    pub cart_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartCountDto {
    pub count: i64,
}

/// Body for adding a product; quantity defaults to 1
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AddToCartDto {
    #[serde(default)]
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY, message = "Quantity must be between 1 and 999"))]
    pub quantity: Option<i32>,
}

impl AddToCartDto {
    pub fn quantity(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }
}

/// Body for overwriting a line's quantity; zero or less removes the line
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemDto {
    pub quantity: i32,
}

/// Outcome of folding a guest cart into an account cart at login
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CartMergeSummaryDto {
    /// Number of cart lines added or increased
    pub merged_items: usize,
    /// Guest cart products that no longer exist
    pub skipped_product_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn line(price: &str, quantity: i32) -> CartLine {
        CartLine {
            product_id: Uuid::now_v7(),
            name: "Snake Plant".to_string(),
            price: Decimal::from_str(price).unwrap(),
            image_filename: "snake.jpg".to_string(),
            stock: 10,
            quantity,
        }
    }

    #[test]
    fn test_view_totals() {
        let view = CartViewDto::from_lines(&[line("10.99", 2), line("25.99", 1)]);

        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, Decimal::from_str("47.97").unwrap());
        assert_eq!(view.items[0].subtotal, Decimal::from_str("21.98").unwrap());
    }

    #[test]
    fn test_empty_view() {
        let view = CartViewDto::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total, Decimal::ZERO);
    }

    #[test]
    fn test_add_quantity_defaults_to_one() {
        let dto: AddToCartDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.quantity(), 1);
        assert!(dto.validate().is_ok());

        let dto = AddToCartDto { quantity: Some(0) };
        assert!(dto.validate().is_err());
    }
}
