use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

/// Database model for users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}
