use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cart::dtos::{AddToCartDto, CartCountDto, CartViewDto, UpdateCartItemDto};
use crate::features::cart::services::CartService;
use crate::shared::types::ApiResponse;

/// Get the signed-in user's cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart contents", body = ApiResponse<CartViewDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<CartViewDto>>> {
    let cart = service.view(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(cart), None, None)))
}

/// Number of items in the signed-in user's cart
#[utoipa::path(
    get,
    path = "/api/cart/count",
    responses(
        (status = 200, description = "Sum of cart quantities", body = ApiResponse<CartCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_cart_count(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<CartCountDto>>> {
    let count = service.count(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(CartCountDto { count }),
        None,
        None,
    )))
}

/// Add a product to the cart (quantity defaults to 1)
#[utoipa::path(
    post,
    path = "/api/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = AddToCartDto,
    responses(
        (status = 200, description = "Product added", body = ApiResponse<CartViewDto>),
        (status = 400, description = "Invalid quantity"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(product_id): Path<Uuid>,
    AppJson(dto): AppJson<AddToCartDto>,
) -> Result<Json<ApiResponse<CartViewDto>>> {
    dto.validate()?;

    let cart = service
        .add_item(user.user_id, product_id, dto.quantity())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(cart),
        Some("Product added to cart".to_string()),
        None,
    )))
}

/// Set the quantity of a cart line (zero or less removes it)
#[utoipa::path(
    put,
    path = "/api/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateCartItemDto,
    responses(
        (status = 200, description = "Cart updated", body = ApiResponse<CartViewDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(product_id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCartItemDto>,
) -> Result<Json<ApiResponse<CartViewDto>>> {
    let cart = service
        .update_item(user.user_id, product_id, dto.quantity)
        .await?;
    Ok(Json(ApiResponse::success(Some(cart), None, None)))
}

/// Remove a product from the cart
#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartViewDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartViewDto>>> {
    let cart = service.remove_item(user.user_id, product_id).await?;
    Ok(Json(ApiResponse::success(
        Some(cart),
        Some("Item removed from cart".to_string()),
        None,
    )))
}

/// Remove every item from the cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Cart cleared".to_string()),
        None,
    )))
}
