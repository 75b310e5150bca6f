use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::products::dtos::{
    AdminProductQueryParams, ProductRequestDto, ProductResponseDto,
};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta};

/// List products (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(AdminProductQueryParams),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Vec<ProductResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_products(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Query(params): Query<AdminProductQueryParams>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let (items, total) = service.list(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a product
#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductRequestDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 409, description = "SKU already exists")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<ProductRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    let dto = dto.normalize();
    dto.validate()?;

    let product = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(product),
            Some("Product added successfully".to_string()),
            None,
        )),
    ))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductRequestDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "SKU already exists")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ProductRequestDto>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let dto = dto.normalize();
    dto.validate()?;

    let product = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(product),
        Some("Product updated successfully".to_string()),
        None,
    )))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Product deleted successfully".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::categories::CategoryService;
    use crate::features::products::routes::admin_routes;
    use crate::features::products::services::ProductService;
    use crate::shared::test_helpers::{create_admin_user, lazy_pool, with_user};

    fn admin_server() -> TestServer {
        let pool = lazy_pool();
        let categories = Arc::new(CategoryService::new(pool.clone()));
        let router = admin_routes(Arc::new(ProductService::new(pool, categories)));
        TestServer::new(with_user(router, create_admin_user())).unwrap()
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let response = admin_server()
            .post("/products")
            .json(&json!({
                "name": "Fern",
                "price": "-2.00",
                "image_filename": "fern.jpg",
                "stock": 3
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "price: Price cannot be negative");
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let response = admin_server()
            .post("/products")
            .json(&json!({
                "name": "Fern",
                "price": "2.00",
                "image_filename": "fern.jpg",
                "stock": -1
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
