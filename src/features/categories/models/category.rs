use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Category with the number of products filed under it
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_count: i64,
}
