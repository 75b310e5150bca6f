use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, GuestCartToken};
use crate::features::cart::dtos::{AddToCartDto, GuestCartResponseDto, UpdateCartItemDto};
use crate::features::cart::services::CartService;
use crate::shared::types::ApiResponse;

/// Get the guest cart carried by `X-Cart-Token`
#[utoipa::path(
    get,
    path = "/api/cart/guest",
    params(
        ("X-Cart-Token" = Option<String>, Header, description = "Signed guest cart")
    ),
    responses(
        (status = 200, description = "Guest cart contents", body = ApiResponse<GuestCartResponseDto>),
        (status = 400, description = "Invalid cart token")
    ),
    tag = "cart"
)]
pub async fn get_guest_cart(
    State(service): State<Arc<CartService>>,
    GuestCartToken(token): GuestCartToken,
) -> Result<Json<ApiResponse<GuestCartResponseDto>>> {
    let cart = service.guest_view(token.as_deref()).await?;
    Ok(Json(ApiResponse::success(Some(cart), None, None)))
}

/// Add a product to the guest cart
#[utoipa::path(
    post,
    path = "/api/cart/guest/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("X-Cart-Token" = Option<String>, Header, description = "Signed guest cart")
    ),
    request_body = AddToCartDto,
    responses(
        (status = 200, description = "Product added", body = ApiResponse<GuestCartResponseDto>),
        (status = 400, description = "Invalid quantity or cart token"),
        (status = 404, description = "Product not found")
    ),
    tag = "cart"
)]
pub async fn add_guest_cart_item(
    State(service): State<Arc<CartService>>,
    GuestCartToken(token): GuestCartToken,
    Path(product_id): Path<Uuid>,
    AppJson(dto): AppJson<AddToCartDto>,
) -> Result<Json<ApiResponse<GuestCartResponseDto>>> {
    dto.validate()?;

    let cart = service
        .guest_add(token.as_deref(), product_id, dto.quantity())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(cart),
        Some("Product added to cart".to_string()),
        None,
    )))
}

/// Set the quantity of a guest cart line (zero or less removes it)
#[utoipa::path(
    put,
    path = "/api/cart/guest/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("X-Cart-Token" = Option<String>, Header, description = "Signed guest cart")
    ),
    request_body = UpdateCartItemDto,
    responses(
        (status = 200, description = "Cart updated", body = ApiResponse<GuestCartResponseDto>),
        (status = 400, description = "Invalid cart token")
    ),
    tag = "cart"
)]
pub async fn update_guest_cart_item(
    State(service): State<Arc<CartService>>,
    GuestCartToken(token): GuestCartToken,
    Path(product_id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCartItemDto>,
) -> Result<Json<ApiResponse<GuestCartResponseDto>>> {
    let cart = service
        .guest_update(token.as_deref(), product_id, dto.quantity)
        .await?;
    Ok(Json(ApiResponse::success(Some(cart), None, None)))
}

/// Remove a product from the guest cart
#[utoipa::path(
    delete,
    path = "/api/cart/guest/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("X-Cart-Token" = Option<String>, Header, description = "Signed guest cart")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<GuestCartResponseDto>),
        (status = 400, description = "Invalid cart token")
    ),
    tag = "cart"
)]
pub async fn remove_guest_cart_item(
    State(service): State<Arc<CartService>>,
    GuestCartToken(token): GuestCartToken,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GuestCartResponseDto>>> {
    let cart = service
        .guest_remove(token.as_deref(), product_id)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(cart),
        Some("Item removed from cart".to_string()),
        None,
    )))
}

/// Empty the guest cart
#[utoipa::path(
    delete,
    path = "/api/cart/guest",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<GuestCartResponseDto>)
    ),
    tag = "cart"
)]
pub async fn clear_guest_cart(
    State(service): State<Arc<CartService>>,
) -> Json<ApiResponse<GuestCartResponseDto>> {
    Json(ApiResponse::success(
        Some(service.guest_clear()),
        Some("Cart cleared".to_string()),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::features::cart::guest_cart::GuestCart;
    use crate::features::cart::routes::public_routes;
    use crate::shared::test_helpers::test_cart_service;

    fn server() -> TestServer {
        TestServer::new(public_routes(test_cart_service())).unwrap()
    }

    #[tokio::test]
    async fn test_no_token_is_an_empty_cart() {
        let response = server().get("/api/cart/guest").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["cart"]["item_count"], 0);
        assert_eq!(body["data"]["cart_token"], Value::Null);
    }

    #[tokio::test]
    async fn test_forged_token_is_rejected() {
        let response = server()
            .get("/api/cart/guest")
            .add_header("x-cart-token", "forged.token.value")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_removing_last_line_drops_token() {
        let service = test_cart_service();
        let product = Uuid::now_v7();
        let mut cart = GuestCart::new();
        cart.add(product, 2);
        let token = service.codec().encode(&cart).unwrap().unwrap();

        let server = TestServer::new(public_routes(service)).unwrap();
        let response = server
            .delete(&format!("/api/cart/guest/items/{}", product))
            .add_header("x-cart-token", token)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["cart_token"], Value::Null);
        assert_eq!(body["data"]["cart"]["items"], json!([]));
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let service = test_cart_service();
        let product = Uuid::now_v7();
        let mut cart = GuestCart::new();
        cart.add(product, 5);
        let token = service.codec().encode(&cart).unwrap().unwrap();

        let server = TestServer::new(public_routes(service)).unwrap();
        let response = server
            .put(&format!("/api/cart/guest/items/{}", product))
            .add_header("x-cart-token", token)
            .json(&json!({ "quantity": 0 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["cart"]["item_count"], 0);
    }

    #[tokio::test]
    async fn test_clear_always_succeeds() {
        let response = server()
            .delete("/api/cart/guest")
            .add_header("x-cart-token", "whatever")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Cart cleared");
    }
}
