use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Columns for `Product`; expects `products p LEFT JOIN categories c`
pub const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.image_filename, p.stock,
           p.category_id, c.name AS category_name, p.sku, p.tags,
           p.is_featured, p.is_hot, p.is_sale, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Database model for product, with its category name
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_filename: String,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub sku: Option<String>,
    pub tags: Option<String>,
    pub is_featured: bool,
    pub is_hot: bool,
    pub is_sale: bool,
    pub created_at: DateTime<Utc>,
}
