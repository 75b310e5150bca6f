use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::admin::handlers;
use crate::features::admin::services::DashboardService;

/// Back-office dashboard, nested under `/api/admin`
pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .with_state(service)
}
