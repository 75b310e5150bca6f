use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::cart::services::{load_cart_lines, lock_cart};
use crate::features::cart::CartService;
use crate::features::orders::dtos::{
    AdminOrderQueryParams, CheckoutRequestDto, CheckoutSummaryDto, OrderResponseDto,
    OrderSummaryDto,
};
use crate::features::orders::models::{Order, OrderItem, OrderStatus, OrderSummary};
use crate::features::orders::snapshot::OrderSnapshot;

const ORDER_COLUMNS: &str = r#"
    id, user_id, first_name, last_name, email, phone, telephone, company,
    address, city, state, country, postcode, order_notes, total_amount, status,
    created_at, updated_at
"#;

const ORDER_SUMMARY_SELECT: &str = r#"
    SELECT o.id, o.user_id, u.username, o.first_name, o.last_name, o.total_amount,
           o.status, o.created_at,
           (SELECT COALESCE(SUM(oi.quantity), 0) FROM order_items oi WHERE oi.order_id = o.id)::BIGINT
               AS item_count
    FROM orders o
    LEFT JOIN users u ON u.id = o.user_id
"#;

/// Service for checkout and order management
pub struct OrderService {
    pool: PgPool,
    carts: Arc<CartService>,
}

impl OrderService {
    pub fn new(pool: PgPool, carts: Arc<CartService>) -> Self {
        Self { pool, carts }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn load_items<'e, E>(executor: E, order_id: Uuid) -> Result<Vec<OrderItem>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, product_id, product_name, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load items of order {}: {:?}", order_id, e);
            AppError::Database(e)
        })
    }

    // =========================================================================
    // CHECKOUT
    // =========================================================================

    /// Cart review before checkout; an empty cart cannot be checked out
    pub async fn checkout_summary(&self, user_id: Uuid) -> Result<CheckoutSummaryDto> {
        let cart = self.carts.view(user_id).await?;
        if cart.items.is_empty() {
            return Err(AppError::BadRequest("Your cart is empty".to_string()));
        }
        Ok(CheckoutSummaryDto { cart })
    }

    /// Turn the user's cart into an order.
    ///
    /// Runs in one transaction: lock the cart, snapshot its lines at current
    /// prices, insert the order and its items, take the quantities out of
    /// stock and empty the cart. Any failure rolls all of it back.
    ///
    /// An empty cart is reported before any problem with the shipping details.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        dto: CheckoutRequestDto,
    ) -> Result<OrderResponseDto> {
        let mut tx = self.begin().await?;

        let cart = lock_cart(&mut tx, user_id).await?;
        let lines = load_cart_lines(&mut *tx, cart.id).await?;
        let snapshot = OrderSnapshot::from_lines(&lines)?;
        dto.validate()?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (id, user_id, first_name, last_name, email, phone, telephone,
                                company, address, city, state, country, postcode, order_notes,
                                total_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.telephone)
        .bind(&dto.company)
        .bind(&dto.address)
        .bind(&dto.city)
        .bind(&dto.state)
        .bind(dto.country_or_default())
        .bind(&dto.postcode)
        .bind(&dto.order_notes)
        .bind(snapshot.total)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert order: {:?}", e);
            AppError::Database(e)
        })?;

        for item in &snapshot.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert order item: {:?}", e);
                AppError::Database(e)
            })?;
        }

        for (product_id, quantity, name) in snapshot.stock_decrements() {
            let updated = sqlx::query(
                "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
            )
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to decrement stock of {}: {:?}", product_id, e);
                AppError::Database(e)
            })?;

            if updated.rows_affected() == 0 {
                tracing::info!(
                    user_id = %user_id,
                    product_id = %product_id,
                    requested = quantity,
                    "Checkout rejected: insufficient stock"
                );
                return Err(AppError::Conflict(format!(
                    "Not enough stock for {}",
                    name
                )));
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to empty cart after checkout: {:?}", e);
                AppError::Database(e)
            })?;

        let items = Self::load_items(&mut *tx, order.id).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit checkout: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total_amount,
            lines = items.len(),
            "Order placed"
        );

        Ok(OrderResponseDto::new(order, items))
    }

    // =========================================================================
    // CUSTOMER VIEWS
    // =========================================================================

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderSummaryDto>> {
        let orders = sqlx::query_as::<_, OrderSummary>(&format!(
            "{} WHERE o.user_id = $1 ORDER BY o.created_at DESC",
            ORDER_SUMMARY_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders of user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(orders.into_iter().map(OrderSummaryDto::from).collect())
    }

    /// An order that belongs to someone else is reported as not found
    pub async fn get_for_user(&self, user_id: Uuid, order_id: Uuid) -> Result<OrderResponseDto> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1 AND user_id = $2",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let items = Self::load_items(&self.pool, order.id).await?;
        Ok(OrderResponseDto::new(order, items))
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    pub async fn list(&self, params: &AdminOrderQueryParams) -> Result<(Vec<OrderSummaryDto>, i64)> {
        let pagination = params.pagination();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::order_status IS NULL OR status = $1)",
        )
        .bind(params.status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let orders = sqlx::query_as::<_, OrderSummary>(&format!(
            r#"
            {}
            WHERE ($1::order_status IS NULL OR o.status = $1)
            ORDER BY o.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            ORDER_SUMMARY_SELECT
        ))
        .bind(params.status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((orders.into_iter().map(OrderSummaryDto::from).collect(), total))
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<OrderSummaryDto>> {
        let orders = sqlx::query_as::<_, OrderSummary>(&format!(
            "{} ORDER BY o.created_at DESC LIMIT $1",
            ORDER_SUMMARY_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load recent orders: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(orders.into_iter().map(OrderSummaryDto::from).collect())
    }

    pub async fn get(&self, order_id: Uuid) -> Result<OrderResponseDto> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let items = Self::load_items(&self.pool, order.id).await?;
        Ok(OrderResponseDto::new(order, items))
    }

    /// Move an order along the status graph.
    ///
    /// Re-applying the current status is a no-op. Cancelling puts the ordered
    /// quantities back into stock.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<OrderResponseDto> {
        let mut tx = self.begin().await?;

        let current: OrderStatus =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if current == next {
            drop(tx);
            return self.get(order_id).await;
        }

        if current.is_terminal() {
            return Err(AppError::Conflict(format!("Order is already {}", current)));
        }

        if !current.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot change order status from {} to {}",
                current, next
            )));
        }

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(order_id)
            .bind(next)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update order status: {:?}", e);
                AppError::Database(e)
            })?;

        if next == OrderStatus::Cancelled {
            sqlx::query(
                r#"
                UPDATE products p
                SET stock = p.stock + oi.quantity
                FROM order_items oi
                WHERE oi.order_id = $1 AND oi.product_id = p.id
                "#,
            )
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to restock cancelled order: {:?}", e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit status change: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(order_id = %order_id, from = %current, to = %next, "Order status changed");
        self.get(order_id).await
    }

    /// Delete an order and its items; stock is not touched
    pub async fn delete(&self, order_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete order {}: {:?}", order_id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }

        tracing::info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use super::*;
    use crate::shared::test_helpers::{
        cart_rows, cart_service_on, product_stock, seed_product, seed_user,
    };

    fn shipping(phone: &str) -> CheckoutRequestDto {
        CheckoutRequestDto {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: phone.to_string(),
            telephone: None,
            company: None,
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: None,
            postcode: None,
            order_notes: None,
        }
    }

    fn order_service(pool: &PgPool) -> (OrderService, Arc<CartService>) {
        let carts = cart_service_on(pool.clone());
        (OrderService::new(pool.clone(), carts.clone()), carts)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_checkout_snapshots_cart_and_empties_it(pool: PgPool) {
        let (orders, carts) = order_service(&pool);
        let user_id = seed_user(&pool, "asha").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        let palm = seed_product(&pool, "Areca Palm", "25.99", 3).await;

        carts.add_item(user_id, fern, 2).await.unwrap();
        carts.add_item(user_id, palm, 1).await.unwrap();

        let order = orders.checkout(user_id, shipping("9876543210")).await.unwrap();

        assert_eq!(order.total_amount, Decimal::from_str("47.97").unwrap());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.country, "india");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_name, "Boston Fern");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].subtotal, Decimal::from_str("21.98").unwrap());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert_eq!(product_stock(&pool, fern).await, 3);
        assert_eq!(product_stock(&pool, palm).await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stock_shortfall_rolls_back_everything(pool: PgPool) {
        let (orders, carts) = order_service(&pool);
        let user_id = seed_user(&pool, "ravi").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        let bonsai = seed_product(&pool, "Bonsai", "49.00", 1).await;

        carts.add_item(user_id, fern, 2).await.unwrap();
        carts.add_item(user_id, bonsai, 2).await.unwrap();

        let result = orders.checkout(user_id, shipping("9876543210")).await;

        match result {
            Err(AppError::Conflict(message)) => assert_eq!(message, "Not enough stock for Bonsai"),
            other => panic!("expected a stock conflict, got {:?}", other.map(|o| o.id)),
        }

        let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(order_count, 0);
        assert_eq!(product_stock(&pool, fern).await, 5);
        assert_eq!(product_stock(&pool, bonsai).await, 1);
        assert_eq!(cart_rows(&pool, user_id).await, vec![(fern, 2), (bonsai, 2)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_cart_reported_before_field_errors(pool: PgPool) {
        let (orders, _) = order_service(&pool);
        let user_id = seed_user(&pool, "meera").await;

        let result = orders.checkout(user_id, shipping("98765 4321")).await;

        match result {
            Err(AppError::BadRequest(message)) => assert_eq!(message, "Your cart is empty"),
            other => panic!("expected an empty cart error, got {:?}", other.map(|o| o.id)),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_field_errors_leave_cart_untouched(pool: PgPool) {
        let (orders, carts) = order_service(&pool);
        let user_id = seed_user(&pool, "kiran").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        carts.add_item(user_id, fern, 1).await.unwrap();

        let result = orders.checkout(user_id, shipping("98765 4321")).await;

        match result {
            Err(AppError::InvalidFields(errors)) => assert_eq!(
                errors,
                vec!["phone: Phone number must be exactly 10 digits".to_string()]
            ),
            other => panic!("expected field errors, got {:?}", other.map(|o| o.id)),
        }
        assert_eq!(cart_rows(&pool, user_id).await, vec![(fern, 1)]);
        assert_eq!(product_stock(&pool, fern).await, 5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_cancel_restocks_and_is_final(pool: PgPool) {
        let (orders, carts) = order_service(&pool);
        let user_id = seed_user(&pool, "dev").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        carts.add_item(user_id, fern, 3).await.unwrap();

        let order = orders.checkout(user_id, shipping("9876543210")).await.unwrap();
        assert_eq!(product_stock(&pool, fern).await, 2);

        let cancelled = orders
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(product_stock(&pool, fern).await, 5);

        let again = orders
            .update_status(order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(again.status, OrderStatus::Cancelled);
        assert_eq!(product_stock(&pool, fern).await, 5);

        let reopened = orders.update_status(order.id, OrderStatus::Processing).await;
        assert!(matches!(reopened, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_orders_are_private_to_their_owner(pool: PgPool) {
        let (orders, carts) = order_service(&pool);
        let owner = seed_user(&pool, "owner").await;
        let other = seed_user(&pool, "other").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        carts.add_item(owner, fern, 1).await.unwrap();

        let order = orders.checkout(owner, shipping("9876543210")).await.unwrap();

        assert_eq!(orders.get_for_user(owner, order.id).await.unwrap().id, order.id);
        assert!(matches!(
            orders.get_for_user(other, order.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(orders.list_for_user(owner).await.unwrap().len(), 1);
        assert!(orders.list_for_user(other).await.unwrap().is_empty());
    }
}
