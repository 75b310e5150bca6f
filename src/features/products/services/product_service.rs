use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::CategoryService;
use crate::features::products::dtos::{
    AdminProductQueryParams, PageInfo, PriceRangeDto, ProductDetailDto, ProductRequestDto,
    ProductResponseDto, ShopPageDto, ShopQueryParams,
};
use crate::features::products::filter::{FilterValue, ShopFilter, ShopSort};
use crate::features::products::models::{Product, PRODUCT_SELECT};
use crate::shared::constants::{BEST_SELLERS_LIMIT, RELATED_PRODUCTS_LIMIT};

const DUPLICATE_SKU: &str = "A product with this SKU already exists";

/// Service for catalog browsing and product administration
pub struct ProductService {
    pool: PgPool,
    categories: Arc<CategoryService>,
}

impl ProductService {
    pub fn new(pool: PgPool, categories: Arc<CategoryService>) -> Self {
        Self { pool, categories }
    }

    /// Count and fetch one page of products matching `filter`
    async fn filtered_page(
        &self,
        filter: &ShopFilter,
        sort: ShopSort,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Product>, PageInfo)> {
        let (where_clause, values) = filter.where_clause();

        let count_sql = format!(
            "SELECT COUNT(*) FROM products p {}",
            where_clause
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &values {
            count_query = match value {
                FilterValue::Uuid(v) => count_query.bind(*v),
                FilterValue::Decimal(v) => count_query.bind(*v),
                FilterValue::Text(v) => count_query.bind(v.clone()),
            };
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count products: {:?}", e);
            AppError::Database(e)
        })?;

        let page_info = PageInfo::new(total, page, per_page);

        let select_sql = format!(
            "{} {} ORDER BY {} LIMIT ${} OFFSET ${}",
            PRODUCT_SELECT,
            where_clause,
            sort.as_sql(),
            values.len() + 1,
            values.len() + 2
        );
        let mut select_query = sqlx::query_as::<_, Product>(&select_sql);
        for value in &values {
            select_query = match value {
                FilterValue::Uuid(v) => select_query.bind(*v),
                FilterValue::Decimal(v) => select_query.bind(*v),
                FilterValue::Text(v) => select_query.bind(v.clone()),
            };
        }
        let products = select_query
            .bind(page_info.per_page)
            .bind(page_info.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((products, page_info))
    }

    /// Shop listing: filtered page plus price range, categories and best sellers
    pub async fn shop(&self, params: &ShopQueryParams) -> Result<ShopPageDto> {
        let (products, pagination) = self
            .filtered_page(&params.filter(), params.sort, params.page(), params.per_page())
            .await?;

        let (min, max): (Option<Decimal>, Option<Decimal>) =
            sqlx::query_as("SELECT MIN(price), MAX(price) FROM products")
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        let best_sellers = sqlx::query_as::<_, Product>(&format!(
            "{} WHERE p.is_featured = TRUE ORDER BY p.created_at DESC LIMIT $1",
            PRODUCT_SELECT
        ))
        .bind(BEST_SELLERS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load best sellers: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ShopPageDto {
            products: products.into_iter().map(ProductResponseDto::from).collect(),
            pagination,
            price_range: PriceRangeDto::from_bounds(min, max),
            categories: self.categories.list().await?,
            best_sellers: best_sellers
                .into_iter()
                .map(ProductResponseDto::from)
                .collect(),
        })
    }

    async fn find(&self, id: Uuid) -> Result<Product> {
        sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get product {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ProductResponseDto> {
        Ok(self.find(id).await?.into())
    }

    /// Product page with other products of the same category
    pub async fn detail(&self, id: Uuid) -> Result<ProductDetailDto> {
        let product = self.find(id).await?;

        let related = match product.category_id {
            Some(category_id) => sqlx::query_as::<_, Product>(&format!(
                "{} WHERE p.category_id = $1 AND p.id <> $2 ORDER BY p.created_at DESC LIMIT $3",
                PRODUCT_SELECT
            ))
            .bind(category_id)
            .bind(id)
            .bind(RELATED_PRODUCTS_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load related products: {:?}", e);
                AppError::Database(e)
            })?,
            None => Vec::new(),
        };

        Ok(ProductDetailDto {
            product: product.into(),
            related_products: related.into_iter().map(ProductResponseDto::from).collect(),
        })
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    pub async fn list(
        &self,
        params: &AdminProductQueryParams,
    ) -> Result<(Vec<ProductResponseDto>, i64)> {
        let filter = ShopFilter {
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ..Default::default()
        };
        let pagination = params.pagination();

        let (products, info) = self
            .filtered_page(
                &filter,
                ShopSort::Newest,
                pagination.page(),
                pagination.limit(),
            )
            .await?;

        Ok((
            products.into_iter().map(ProductResponseDto::from).collect(),
            info.total,
        ))
    }

    async fn ensure_category(&self, category_id: Option<Uuid>) -> Result<()> {
        if let Some(id) = category_id {
            if !self.categories.exists(id).await? {
                return Err(AppError::BadRequest(format!(
                    "Category with id {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }

    pub async fn create(&self, dto: ProductRequestDto) -> Result<ProductResponseDto> {
        self.ensure_category(dto.category_id).await?;

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, image_filename, stock,
                                  category_id, sku, tags, is_featured, is_hot, is_sale)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(&dto.image_filename)
        .bind(dto.stock)
        .bind(dto.category_id)
        .bind(&dto.sku)
        .bind(&dto.tags)
        .bind(dto.is_featured)
        .bind(dto.is_hot)
        .bind(dto.is_sale)
        .execute(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, DUPLICATE_SKU))?;

        tracing::info!(product_id = %id, name = %dto.name, "Product created");
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: ProductRequestDto) -> Result<ProductResponseDto> {
        self.ensure_category(dto.category_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, image_filename = $5, stock = $6,
                category_id = $7, sku = $8, tags = $9,
                is_featured = $10, is_hot = $11, is_sale = $12
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(&dto.image_filename)
        .bind(dto.stock)
        .bind(dto.category_id)
        .bind(&dto.sku)
        .bind(&dto.tags)
        .bind(dto.is_featured)
        .bind(dto.is_hot)
        .bind(dto.is_sale)
        .execute(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, DUPLICATE_SKU))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        tracing::info!(product_id = %id, "Product updated");
        self.get_by_id(id).await
    }

    /// Delete a product; past order lines keep their name and price
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
