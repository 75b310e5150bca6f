use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::products::filter::{ShopFilter, ShopSort};
use crate::features::products::models::Product;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SHOP_DEFAULT_PER_PAGE};
use crate::shared::types::{clamp_page, PaginationQuery};
use crate::shared::validation::{trim_in_place, trim_optional, validate_not_blank};

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "10.99")]
    pub price: Decimal,
    pub image_filename: String,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub sku: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub is_hot: bool,
    pub is_sale: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image_filename: p.image_filename,
            stock: p.stock,
            category_id: p.category_id,
            category_name: p.category_name,
            sku: p.sku,
            tags: split_tags(p.tags.as_deref()),
            is_featured: p.is_featured,
            is_hot: p.is_hot,
            is_sale: p.is_sale,
            created_at: p.created_at,
        }
    }
}

/// Split the stored comma-separated tag list
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Query params for the shop listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShopQueryParams {
    /// Restrict to one category
    pub category: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// price_low, price_high, name_asc, name_desc or newest (default)
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub sort: ShopSort,
    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,
    /// Products per page (default: 9, max: 100)
    pub per_page: Option<i64>,
}

impl ShopQueryParams {
    pub fn filter(&self) -> ShopFilter {
        ShopFilter {
            category_id: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            search: trim_optional(self.search.clone()),
        }
    }

    pub fn page(&self) -> i64 {
        clamp_page(self.page.unwrap_or(1))
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(SHOP_DEFAULT_PER_PAGE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Position of one page within a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    /// 1-based index of the first item shown; 0 (with `end_item` 0) when the page is empty
    pub start_item: i64,
    pub end_item: i64,
}

impl PageInfo {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let page = clamp_page(page);
        let per_page = per_page.max(1);
        let total_pages = total.max(0).saturating_add(per_page - 1) / per_page;
        let end_item = page.saturating_mul(per_page).min(total);
        let start_item = (page - 1).saturating_mul(per_page).saturating_add(1);
        let (start_item, end_item) = if start_item > end_item {
            (0, 0)
        } else {
            (start_item, end_item)
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
            start_item,
            end_item,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Lowest and highest catalog price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRangeDto {
    #[schema(value_type = String)]
    pub min: Decimal,
    #[schema(value_type = String)]
    pub max: Decimal,
}

impl PriceRangeDto {
    /// Empty catalog defaults to 0..100
    pub fn from_bounds(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self {
            min: min.unwrap_or(Decimal::ZERO),
            max: max.unwrap_or(Decimal::ONE_HUNDRED),
        }
    }
}

/// Shop listing with sidebar data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShopPageDto {
    pub products: Vec<ProductResponseDto>,
    pub pagination: PageInfo,
    pub price_range: PriceRangeDto,
    pub categories: Vec<CategoryResponseDto>,
    pub best_sellers: Vec<ProductResponseDto>,
}

/// Product page with products from the same category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    pub product: ProductResponseDto,
    pub related_products: Vec<ProductResponseDto>,
}

/// Query params for the back-office product list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminProductQueryParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,
    /// Number of items per page (default: 10, max: 100)
    pub page_size: Option<i64>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

impl AdminProductQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Request DTO for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductRequestDto {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 200, message = "Name must be at most 200 characters")
    )]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[schema(value_type = String, example = "10.99")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 300, message = "Image filename must be at most 300 characters")
    )]
    pub image_filename: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    #[serde(default)]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(max = 50, message = "SKU must be at most 50 characters"))]
    pub sku: Option<String>,

    /// Comma-separated tags
    #[serde(default)]
    #[validate(length(max = 200, message = "Tags must be at most 200 characters"))]
    pub tags: Option<String>,

    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_sale: bool,
}

/// Largest value a NUMERIC(12,2) column holds
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut error = ValidationError::new("price");
        error.message = Some("Price cannot be negative".into());
        return Err(error);
    }
    if *price > max_price() {
        let mut error = ValidationError::new("price");
        error.message = Some("Price must be at most 9999999999.99".into());
        return Err(error);
    }
    if price.scale() > 2 && price.round_dp(2) != *price {
        let mut error = ValidationError::new("price");
        error.message = Some("Price can have at most two decimal places".into());
        return Err(error);
    }
    Ok(())
}

impl ProductRequestDto {
    pub fn normalize(mut self) -> Self {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.image_filename);
        self.description = trim_optional(self.description);
        self.sku = trim_optional(self.sku);
        self.tags = trim_optional(self.tags);
        self
    }
}
