use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{DashboardCountsDto, DashboardDto};
use crate::features::orders::OrderService;
use crate::shared::constants::DASHBOARD_RECENT_ORDERS;

/// Service for back-office statistics
pub struct DashboardService {
    pool: PgPool,
    orders: Arc<OrderService>,
}

impl DashboardService {
    pub fn new(pool: PgPool, orders: Arc<OrderService>) -> Self {
        Self { pool, orders }
    }

    pub async fn counts(&self) -> Result<DashboardCountsDto> {
        sqlx::query_as::<_, DashboardCountsDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COUNT(*) FROM categories) AS total_categories,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status <> 'cancelled')
                    AS total_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get dashboard counts: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get_dashboard(&self) -> Result<DashboardDto> {
        let counts = self.counts().await?;
        let recent_orders = self.orders.recent(DASHBOARD_RECENT_ORDERS).await?;

        Ok(DashboardDto {
            counts,
            recent_orders,
        })
    }
}
