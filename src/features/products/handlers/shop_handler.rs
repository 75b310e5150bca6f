use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::products::dtos::{ProductDetailDto, ShopPageDto, ShopQueryParams};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta};

/// Browse the catalog
///
/// Filters combine with AND. Sort defaults to newest first.
#[utoipa::path(
    get,
    path = "/api/shop",
    params(ShopQueryParams),
    responses(
        (status = 200, description = "Shop page", body = ApiResponse<ShopPageDto>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "shop"
)]
pub async fn shop(
    State(service): State<Arc<ProductService>>,
    Query(params): Query<ShopQueryParams>,
) -> Result<Json<ApiResponse<ShopPageDto>>> {
    let page = service.shop(&params).await?;
    let total = page.pagination.total;
    Ok(Json(ApiResponse::success(
        Some(page),
        None,
        Some(Meta { total }),
    )))
}

/// Product page with related products
#[utoipa::path(
    get,
    path = "/api/shop/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "shop"
)]
pub async fn product_detail(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let detail = service.detail(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}
