use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Checkout and order history routes (require JWT authentication)
pub fn protected_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route(
            "/api/checkout",
            get(handlers::checkout_summary).post(handlers::checkout),
        )
        .route("/api/orders", get(handlers::list_my_orders))
        .route("/api/orders/{id}", get(handlers::get_my_order))
        .with_state(service)
}

/// Order administration routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/orders", get(handlers::list_orders))
        .route(
            "/orders/{id}",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route("/orders/{id}/status", patch(handlers::update_order_status))
        .with_state(service)
}
