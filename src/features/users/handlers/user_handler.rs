use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{ChangePasswordDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List all users (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let (items, total) = service.list(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Delete a user (an admin cannot delete their own account)
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Attempt to delete own account"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&admin, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted successfully".to_string()),
        None,
    )))
}

/// Change the signed-in admin's password
#[utoipa::path(
    put,
    path = "/api/admin/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation error or wrong current password"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<ChangePasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()?;

    service.change_password(admin.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password changed successfully".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::users::routes::admin_routes;
    use crate::features::users::services::UserService;
    use crate::shared::test_helpers::{
        create_admin_user, create_customer_user, lazy_pool, with_user,
    };
    use std::sync::Arc;

    fn server_as(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let router = admin_routes(Arc::new(UserService::new(lazy_pool())));
        TestServer::new(with_user(router, user)).unwrap()
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let admin = create_admin_user();
        let server = server_as(admin.clone());

        let response = server.delete(&format!("/users/{}", admin.user_id)).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "You cannot delete your own account");
    }

    #[tokio::test]
    async fn test_customer_cannot_list_users() {
        let server = server_as(create_customer_user());

        let response = server.get("/users").await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_change_password_validation_runs_first() {
        let server = server_as(create_admin_user());

        let response = server
            .put("/password")
            .json(&json!({
                "current_password": "admin123",
                "new_password": "abc",
                "confirm_password": "abc"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }
}
