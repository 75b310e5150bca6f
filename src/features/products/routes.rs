use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Public catalog routes
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/shop", get(handlers::shop))
        .route("/api/shop/{id}", get(handlers::product_detail))
        .with_state(service)
}

/// Product administration routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .with_state(service)
}
