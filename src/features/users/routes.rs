use std::sync::Arc;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// User administration routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/{id}", delete(handlers::delete_user))
        .route("/password", put(handlers::change_password))
        .with_state(service)
}
