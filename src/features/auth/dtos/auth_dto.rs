use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::cart::dtos::CartMergeSummaryDto;
use crate::features::users::models::User;
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for customer registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_password_confirmation"))]
pub struct RegisterRequestDto {
    #[validate(
        length(min = 1, max = 80, message = "Username must be 1-80 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username may only contain letters, digits and underscores"
        )
    )]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,

    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "Password must be at least 6 characters long"
    ))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_password_confirmation(dto: &RegisterRequestDto) -> Result<(), ValidationError> {
    if dto.password != dto.password_confirm {
        let mut error = ValidationError::new("password_mismatch");
        error.message = Some("Passwords do not match".into());
        return Err(error);
    }
    Ok(())
}

/// Request DTO for login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Guest cart token to fold into the account cart
    #[serde(default)]
    pub cart_token: Option<String>,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
    /// Present when a guest cart was merged during login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_merge: Option<CartMergeSummaryDto>,
    /// Always null: any guest cart token held by the client is spent and should be dropped
    pub cart_token: Option<String>,
}

/// Account info included in auth responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AuthUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::Fake;

    fn register_dto(password: &str, confirm: &str) -> RegisterRequestDto {
        let username: String = Username().fake();
        RegisterRequestDto {
            username: username.replace(['.', '-'], "_"),
            email: SafeEmail().fake(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register_dto("secret1", "secret1").validate().is_ok());
    }

    #[test]
    fn test_register_password_mismatch() {
        let errors = register_dto("secret1", "secret2").validate().unwrap_err();
        assert!(errors.to_string().contains("Passwords do not match"));
    }

    #[test]
    fn test_register_short_password() {
        let errors = register_dto("abc", "abc").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_requires_fields() {
        let dto = RegisterRequestDto {
            username: String::new(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_login_response_clears_cart_token() {
        let response = AuthResponseDto {
            access_token: "token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            user: AuthUserDto {
                id: Uuid::now_v7(),
                username: "asha".to_string(),
                email: SafeEmail().fake(),
                is_admin: false,
                created_at: Utc::now(),
            },
            cart_merge: Some(CartMergeSummaryDto::default()),
            cart_token: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("cart_token").is_some());
        assert!(json["cart_token"].is_null());
        assert_eq!(json["cart_merge"]["merged_items"], 0);
    }
}
