use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::admin::dtos::DashboardDto;
use crate::features::admin::services::DashboardService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Store totals and the most recent orders
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = ApiResponse<DashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let dashboard = service.get_dashboard().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::features::admin::routes::routes;
    use crate::features::admin::services::DashboardService;
    use crate::shared::test_helpers::{
        create_customer_user, lazy_pool, test_order_service, with_user,
    };

    fn dashboard_service() -> Arc<DashboardService> {
        Arc::new(DashboardService::new(lazy_pool(), test_order_service()))
    }

    #[tokio::test]
    async fn test_dashboard_requires_authentication() {
        let server = TestServer::new(routes(dashboard_service())).unwrap();
        server
            .get("/dashboard")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_dashboard_forbidden_for_customers() {
        let router = with_user(routes(dashboard_service()), create_customer_user());
        let server = TestServer::new(router).unwrap();
        server
            .get("/dashboard")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
