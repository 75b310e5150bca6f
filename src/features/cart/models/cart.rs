use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted cart, one per user
#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: Uuid,
}

/// A cart item joined with its product's current data
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_filename: String,
    pub stock: i32,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
