use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::cart::handlers;
use crate::features::cart::services::CartService;

/// Guest cart routes (no authentication; state travels in `X-Cart-Token`)
pub fn public_routes(service: Arc<CartService>) -> Router {
    Router::new()
        .route(
            "/api/cart/guest",
            get(handlers::get_guest_cart).delete(handlers::clear_guest_cart),
        )
        .route(
            "/api/cart/guest/items/{product_id}",
            post(handlers::add_guest_cart_item)
                .put(handlers::update_guest_cart_item)
                .delete(handlers::remove_guest_cart_item),
        )
        .with_state(service)
}

/// Persisted cart routes (require JWT authentication)
pub fn protected_routes(service: Arc<CartService>) -> Router {
    Router::new()
        .route(
            "/api/cart",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route("/api/cart/count", get(handlers::get_cart_count))
        .route(
            "/api/cart/items/{product_id}",
            post(handlers::add_cart_item)
                .put(handlers::update_cart_item)
                .delete(handlers::remove_cart_item),
        )
        .with_state(service)
}
