use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::orders::dtos::{
    AdminOrderQueryParams, OrderResponseDto, OrderSummaryDto, UpdateOrderStatusDto,
};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta};

/// List all orders (paginated, optionally by status)
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(AdminOrderQueryParams),
    responses(
        (status = 200, description = "List of orders", body = ApiResponse<Vec<OrderSummaryDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Query(params): Query<AdminOrderQueryParams>,
) -> Result<Json<ApiResponse<Vec<OrderSummaryDto>>>> {
    let (items, total) = service.list(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get any order
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponseDto>),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Order not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_order(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Change an order's status
///
/// pending → processing | cancelled, processing → completed | cancelled.
/// Cancelling returns the items to stock.
#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    tracing::debug!(admin = %admin.username, order_id = %id, status = %dto.status, "Status change requested");

    let order = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(order),
        Some("Order status updated".to_string()),
        None,
    )))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Order not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_order(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Order deleted successfully".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    use crate::features::orders::routes::admin_routes;
    use crate::shared::test_helpers::{
        create_admin_user, create_customer_user, test_order_service, with_user,
    };

    #[tokio::test]
    async fn test_customer_cannot_change_status() {
        let router = with_user(admin_routes(test_order_service()), create_customer_user());
        let server = TestServer::new(router).unwrap();

        let response = server
            .patch(&format!("/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "completed" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let router = with_user(admin_routes(test_order_service()), create_admin_user());
        let server = TestServer::new(router).unwrap();

        let response = server
            .patch(&format!("/orders/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "shipped" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
