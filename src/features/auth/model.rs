use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity attached to a request by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub typ: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

pub const ACCESS_TOKEN_TYPE: &str = "access";
