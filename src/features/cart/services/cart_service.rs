use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::dtos::{CartMergeSummaryDto, CartViewDto, GuestCartResponseDto};
use crate::features::cart::guest_cart::{GuestCart, GuestCartCodec, OpenedGuestCart};
use crate::features::cart::merge::plan_merge;
use crate::features::cart::models::{Cart, CartLine};
use crate::shared::constants::MAX_LINE_QUANTITY;

const CART_LINE_QUERY: &str = r#"
    SELECT ci.product_id, p.name, p.price, p.image_filename, p.stock, ci.quantity
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
    WHERE ci.cart_id = $1
    ORDER BY ci.added_at, ci.id
"#;

/// Ensure the user's cart exists and lock its row for the rest of the transaction
pub async fn lock_cart(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<Cart> {
    sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
        .bind(Uuid::now_v7())
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create cart for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

    sqlx::query_as::<_, Cart>(
        "SELECT id FROM carts WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock cart for user {}: {:?}", user_id, e);
        AppError::Database(e)
    })
}

/// Cart items joined with current product data, in insertion order
pub async fn load_cart_lines<'e, E>(executor: E, cart_id: Uuid) -> Result<Vec<CartLine>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, CartLine>(CART_LINE_QUERY)
        .bind(cart_id)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load cart {}: {:?}", cart_id, e);
            AppError::Database(e)
        })
}

/// Service for persisted and guest carts
pub struct CartService {
    pool: PgPool,
    codec: Arc<GuestCartCodec>,
}

impl CartService {
    pub fn new(pool: PgPool, codec: Arc<GuestCartCodec>) -> Self {
        Self { pool, codec }
    }

    pub fn codec(&self) -> &GuestCartCodec {
        &self.codec
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(tx: Transaction<'_, Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn ensure_product_exists(&self, product_id: Uuid) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn cart_id(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find cart for user {}: {:?}", user_id, e);
                AppError::Database(e)
            })
    }

    // =========================================================================
    // PERSISTED CART
    // =========================================================================

    pub async fn view(&self, user_id: Uuid) -> Result<CartViewDto> {
        match self.cart_id(user_id).await? {
            Some(cart_id) => {
                let lines = load_cart_lines(&self.pool, cart_id).await?;
                Ok(CartViewDto::from_lines(&lines))
            }
            None => Ok(CartViewDto::empty()),
        }
    }

    /// Sum of quantities in the user's cart
    pub async fn count(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(ci.quantity), 0)::BIGINT
            FROM cart_items ci
            JOIN carts c ON c.id = ci.cart_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count cart items: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Increment an existing line or insert a new one
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartViewDto> {
        self.ensure_product_exists(product_id).await?;

        let mut tx = self.begin().await?;
        let cart = lock_cart(&mut tx, user_id).await?;

        sqlx::query(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $5)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(cart.id)
        .bind(product_id)
        .bind(quantity.min(MAX_LINE_QUANTITY))
        .bind(MAX_LINE_QUANTITY)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add product {} to cart: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        let lines = load_cart_lines(&mut *tx, cart.id).await?;
        Self::commit(tx).await?;

        Ok(CartViewDto::from_lines(&lines))
    }

    /// Overwrite a line's quantity; zero or less deletes it. Missing lines are left alone.
    pub async fn update_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartViewDto> {
        let Some(cart_id) = self.cart_id(user_id).await? else {
            return Ok(CartViewDto::empty());
        };

        let result = if quantity <= 0 {
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(&self.pool)
                .await
        } else {
            sqlx::query(
                "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
            )
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity.min(MAX_LINE_QUANTITY))
            .execute(&self.pool)
            .await
        };
        result.map_err(|e| {
            tracing::error!("Failed to update cart item: {:?}", e);
            AppError::Database(e)
        })?;

        let lines = load_cart_lines(&self.pool, cart_id).await?;
        Ok(CartViewDto::from_lines(&lines))
    }

    pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> Result<CartViewDto> {
        self.update_item(user_id, product_id, 0).await
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "DELETE FROM cart_items WHERE cart_id = (SELECT id FROM carts WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to clear cart: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(())
    }

    /// Record a guest cart token as used. Returns false when it already was.
    async fn consume_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        jti: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        sqlx::query(
            "DELETE FROM consumed_cart_tokens WHERE consumed_at < NOW() - make_interval(secs => $1)",
        )
        .bind(self.codec.lifetime().as_secs_f64())
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to prune consumed cart tokens: {:?}", e);
            AppError::Database(e)
        })?;

        let inserted = sqlx::query(
            "INSERT INTO consumed_cart_tokens (jti, user_id) VALUES ($1, $2) ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record cart token {}: {:?}", jti, e);
            AppError::Database(e)
        })?
        .rows_affected();

        Ok(inserted == 1)
    }

    /// Fold a guest cart into the user's persisted cart in one transaction.
    ///
    /// Creates the persisted cart on first use. Products that no longer exist
    /// are skipped and reported. A token that was already merged is not merged
    /// again.
    pub async fn merge_guest_cart(
        &self,
        user_id: Uuid,
        opened: &OpenedGuestCart,
    ) -> Result<CartMergeSummaryDto> {
        let guest = &opened.cart;
        let mut tx = self.begin().await?;
        let cart = lock_cart(&mut tx, user_id).await?;

        if guest.is_empty() {
            Self::commit(tx).await?;
            return Ok(CartMergeSummaryDto::default());
        }

        if let Some(jti) = opened.token_id {
            if !self.consume_token(&mut tx, jti, user_id).await? {
                Self::commit(tx).await?;
                tracing::info!(user_id = %user_id, jti = %jti, "Guest cart token already merged");
                return Ok(CartMergeSummaryDto::default());
            }
        }

        let guest_ids = guest.product_ids();

        let known: HashSet<Uuid> =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM products WHERE id = ANY($1)")
                .bind(&guest_ids)
                .fetch_all(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .into_iter()
                .collect();

        let persisted: HashMap<Uuid, i32> = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT product_id, quantity FROM cart_items WHERE cart_id = $1 AND product_id = ANY($2)",
        )
        .bind(cart.id)
        .bind(&guest_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .into_iter()
        .collect();

        let plan = plan_merge(guest, &persisted, &known);

        for line in &plan.lines {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, product_id, quantity)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (cart_id, product_id)
                DO UPDATE SET quantity = EXCLUDED.quantity
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(cart.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to merge product {}: {:?}", line.product_id, e);
                AppError::Database(e)
            })?;
        }

        Self::commit(tx).await?;

        if !plan.skipped_product_ids.is_empty() {
            tracing::warn!(
                user_id = %user_id,
                skipped = ?plan.skipped_product_ids,
                "Guest cart referenced products that no longer exist"
            );
        }
        tracing::info!(
            user_id = %user_id,
            merged = plan.lines.len(),
            "Guest cart merged into account cart"
        );

        Ok(CartMergeSummaryDto {
            merged_items: plan.lines.len(),
            skipped_product_ids: plan.skipped_product_ids,
        })
    }

    // =========================================================================
    // GUEST CART
    // =========================================================================

    /// Price a guest cart against the catalog. Lines for vanished products are omitted.
    pub async fn describe_guest_cart(&self, cart: &GuestCart) -> Result<CartViewDto> {
        if cart.is_empty() {
            return Ok(CartViewDto::empty());
        }

        let products = sqlx::query_as::<_, (Uuid, String, rust_decimal::Decimal, String, i32)>(
            "SELECT id, name, price, image_filename, stock FROM products WHERE id = ANY($1)",
        )
        .bind(cart.product_ids())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load guest cart products: {:?}", e);
            AppError::Database(e)
        })?;

        let by_id: HashMap<Uuid, _> = products
            .into_iter()
            .map(|(id, name, price, image_filename, stock)| {
                (id, (name, price, image_filename, stock))
            })
            .collect();

        let lines: Vec<CartLine> = cart
            .items()
            .iter()
            .filter_map(|(product_id, quantity)| {
                by_id
                    .get(product_id)
                    .map(|(name, price, image_filename, stock)| CartLine {
                        product_id: *product_id,
                        name: name.clone(),
                        price: *price,
                        image_filename: image_filename.clone(),
                        stock: *stock,
                        quantity: *quantity,
                    })
            })
            .collect();

        Ok(CartViewDto::from_lines(&lines))
    }

    async fn guest_response(&self, cart: &GuestCart) -> Result<GuestCartResponseDto> {
        Ok(GuestCartResponseDto {
            cart: self.describe_guest_cart(cart).await?,
            cart_token: self.codec.encode(cart)?,
        })
    }

    pub async fn guest_view(&self, token: Option<&str>) -> Result<GuestCartResponseDto> {
        let cart = self.codec.decode(token)?;
        self.guest_response(&cart).await
    }

    pub async fn guest_add(
        &self,
        token: Option<&str>,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<GuestCartResponseDto> {
        let mut cart = self.codec.decode(token)?;
        self.ensure_product_exists(product_id).await?;
        cart.add(product_id, quantity);
        self.guest_response(&cart).await
    }

    pub async fn guest_update(
        &self,
        token: Option<&str>,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<GuestCartResponseDto> {
        let mut cart = self.codec.decode(token)?;
        cart.set_quantity(product_id, quantity);
        self.guest_response(&cart).await
    }

    pub async fn guest_remove(
        &self,
        token: Option<&str>,
        product_id: Uuid,
    ) -> Result<GuestCartResponseDto> {
        let mut cart = self.codec.decode(token)?;
        cart.remove(product_id);
        self.guest_response(&cart).await
    }

    /// Clearing needs no token validation; the result is always empty
    pub fn guest_clear(&self) -> GuestCartResponseDto {
        GuestCartResponseDto {
            cart: CartViewDto::empty(),
            cart_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sqlx::PgPool;

    use super::*;
    use crate::shared::test_helpers::{cart_rows, cart_service_on, seed_product, seed_user};

    fn guest_with(items: &[(Uuid, i32)]) -> GuestCart {
        GuestCart::from_items(items.iter().copied().collect::<BTreeMap<_, _>>())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_merge_into_empty_account_cart(pool: PgPool) {
        let service = cart_service_on(pool.clone());
        let user_id = seed_user(&pool, "asha").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;

        let token = service.codec().encode(&guest_with(&[(fern, 3)])).unwrap();
        let opened = service.codec().open(token.as_deref()).unwrap();
        let summary = service.merge_guest_cart(user_id, &opened).await.unwrap();

        assert_eq!(summary.merged_items, 1);
        assert!(summary.skipped_product_ids.is_empty());
        assert_eq!(cart_rows(&pool, user_id).await, vec![(fern, 3)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_token_merges_once(pool: PgPool) {
        let service = cart_service_on(pool.clone());
        let user_id = seed_user(&pool, "ravi").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;

        let token = service.codec().encode(&guest_with(&[(fern, 2)])).unwrap();

        let first = service.codec().open(token.as_deref()).unwrap();
        service.merge_guest_cart(user_id, &first).await.unwrap();

        let replay = service.codec().open(token.as_deref()).unwrap();
        let summary = service.merge_guest_cart(user_id, &replay).await.unwrap();

        assert_eq!(summary.merged_items, 0);
        assert_eq!(cart_rows(&pool, user_id).await, vec![(fern, 2)]);

        let consumed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consumed_cart_tokens")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(consumed, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_merge_sums_existing_lines_and_skips_deleted_products(pool: PgPool) {
        let service = cart_service_on(pool.clone());
        let user_id = seed_user(&pool, "meera").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        let gone = Uuid::now_v7();

        service.add_item(user_id, fern, 2).await.unwrap();

        let token = service
            .codec()
            .encode(&guest_with(&[(fern, 3), (gone, 1)]))
            .unwrap();
        let opened = service.codec().open(token.as_deref()).unwrap();
        let summary = service.merge_guest_cart(user_id, &opened).await.unwrap();

        assert_eq!(summary.merged_items, 1);
        assert_eq!(summary.skipped_product_ids, vec![gone]);
        assert_eq!(cart_rows(&pool, user_id).await, vec![(fern, 5)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_item_accumulates_up_to_line_cap(pool: PgPool) {
        let service = cart_service_on(pool.clone());
        let user_id = seed_user(&pool, "kiran").await;
        let cactus = seed_product(&pool, "Cactus", "5.00", 10).await;

        service.add_item(user_id, cactus, 2).await.unwrap();
        let view = service.add_item(user_id, cactus, 3).await.unwrap();
        assert_eq!(view.item_count, 5);

        service
            .add_item(user_id, cactus, MAX_LINE_QUANTITY)
            .await
            .unwrap();
        assert_eq!(
            cart_rows(&pool, user_id).await,
            vec![(cactus, MAX_LINE_QUANTITY)]
        );
        assert_eq!(service.count(user_id).await.unwrap(), i64::from(MAX_LINE_QUANTITY));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_unknown_product_is_not_found(pool: PgPool) {
        let service = cart_service_on(pool.clone());
        let user_id = seed_user(&pool, "dev").await;

        let result = service.add_item(user_id, Uuid::now_v7(), 1).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(cart_rows(&pool, user_id).await.is_empty());
    }
}
