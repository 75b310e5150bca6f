use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{
    CheckoutRequestDto, CheckoutSummaryDto, OrderResponseDto, OrderSummaryDto,
};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta};

/// Review the cart before placing an order
#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Cart ready for checkout", body = ApiResponse<CheckoutSummaryDto>),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn checkout_summary(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
) -> Result<Json<ApiResponse<CheckoutSummaryDto>>> {
    let summary = service.checkout_summary(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

/// Place an order from the cart
///
/// Snapshots the cart at current prices, takes the quantities out of stock and
/// empties the cart, all or nothing.
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequestDto,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Invalid shipping details or empty cart"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Not enough stock")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn checkout(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    AppJson(dto): AppJson<CheckoutRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponseDto>>)> {
    let order = service.checkout(user.user_id, dto.normalize()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(order),
            Some("Order placed successfully".to_string()),
            None,
        )),
    ))
}

/// List the signed-in user's orders, newest first
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "User's orders", body = ApiResponse<Vec<OrderSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_orders(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
) -> Result<Json<ApiResponse<Vec<OrderSummaryDto>>>> {
    let orders = service.list_for_user(user.user_id).await?;
    let total = orders.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(orders),
        None,
        Some(Meta { total }),
    )))
}

/// Get one of the signed-in user's orders
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found or owned by another user")
    ),
    tag = "orders",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_order(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get_for_user(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::orders::routes::protected_routes;
    use crate::shared::test_helpers::{
        cart_service_on, order_service_on, seed_product, seed_user, test_order_service, with_user,
    };

    fn checkout_body(phone: &str) -> Value {
        json!({
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "phone": phone,
            "address": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra"
        })
    }

    async fn signed_in_server(pool: &PgPool, username: &str) -> (TestServer, AuthenticatedUser) {
        let user = AuthenticatedUser {
            user_id: seed_user(pool, username).await,
            username: username.to_string(),
            is_admin: false,
        };
        let router = with_user(protected_routes(order_service_on(pool.clone())), user.clone());
        (TestServer::new(router).unwrap(), user)
    }

    #[tokio::test]
    async fn test_checkout_requires_authentication() {
        let server = TestServer::new(protected_routes(test_order_service())).unwrap();

        let response = server
            .post("/api/checkout")
            .json(&checkout_body("9876543210"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_empty_cart_wins_over_malformed_phone(pool: PgPool) {
        let (server, _) = signed_in_server(&pool, "asha").await;

        let response = server
            .post("/api/checkout")
            .json(&checkout_body("98765 4321"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Your cart is empty");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_malformed_phone_rejected_with_field_error(pool: PgPool) {
        let (server, user) = signed_in_server(&pool, "ravi").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        cart_service_on(pool.clone())
            .add_item(user.user_id, fern, 1)
            .await
            .unwrap();

        let response = server
            .post("/api/checkout")
            .json(&checkout_body("98765 4321"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["errors"],
            json!(["phone: Phone number must be exactly 10 digits"])
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_checkout_returns_created_order(pool: PgPool) {
        let (server, user) = signed_in_server(&pool, "meera").await;
        let fern = seed_product(&pool, "Boston Fern", "10.99", 5).await;
        cart_service_on(pool.clone())
            .add_item(user.user_id, fern, 2)
            .await
            .unwrap();

        let mut body = checkout_body("9876543210");
        body["city"] = json!("  Pune  ");
        let response = server.post("/api/checkout").json(&body).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["total_amount"], "21.98");
        assert_eq!(body["data"]["city"], "Pune");
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

        let response = server.get("/api/orders").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
    }
}
