use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::users::models::User;
use crate::shared::constants::MIN_PASSWORD_LENGTH;

/// User as listed in the back-office
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
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

/// Request DTO for an admin changing their own password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_password_confirmation"))]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "New password must be at least 6 characters long"
    ))]
    pub new_password: String,

    pub confirm_password: String,
}

fn validate_new_password_confirmation(dto: &ChangePasswordDto) -> Result<(), ValidationError> {
    if dto.new_password != dto.confirm_password {
        let mut error = ValidationError::new("password_mismatch");
        error.message = Some("New passwords do not match".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(current: &str, new: &str, confirm: &str) -> ChangePasswordDto {
        ChangePasswordDto {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_change_password_valid() {
        assert!(dto("admin123", "better-pass", "better-pass").validate().is_ok());
    }

    #[test]
    fn test_change_password_rules() {
        assert!(dto("", "better-pass", "better-pass").validate().is_err());
        assert!(dto("admin123", "short", "short").validate().is_err());
        let errors = dto("admin123", "better-pass", "other-pass")
            .validate()
            .unwrap_err();
        assert!(errors.to_string().contains("New passwords do not match"));
    }
}
