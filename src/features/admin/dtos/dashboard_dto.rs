use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::orders::dtos::OrderSummaryDto;

/// Store-wide totals
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct DashboardCountsDto {
    pub total_users: i64,
    pub total_products: i64,
    pub total_categories: i64,
    pub total_orders: i64,
    /// Sum of order totals, cancelled orders excluded
    #[schema(value_type = String, example = "1234.50")]
    pub total_revenue: Decimal,
}

/// Back-office landing page
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardDto {
    #[serde(flatten)]
    pub counts: DashboardCountsDto,
    pub recent_orders: Vec<OrderSummaryDto>,
}
