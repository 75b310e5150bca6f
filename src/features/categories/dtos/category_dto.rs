use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::validation::{trim_in_place, trim_optional, validate_not_blank};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            product_count: c.product_count,
            created_at: c.created_at,
        }
    }
}

/// Request DTO for creating or replacing a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryRequestDto {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryRequestDto {
    pub fn normalize(mut self) -> Self {
        trim_in_place(&mut self.name);
        self.description = trim_optional(self.description);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_and_validate() {
        let dto = CategoryRequestDto {
            name: "  Succulents ".to_string(),
            description: Some("   ".to_string()),
        }
        .normalize();

        assert_eq!(dto.name, "Succulents");
        assert_eq!(dto.description, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let dto = CategoryRequestDto {
            name: "   ".to_string(),
            description: None,
        }
        .normalize();

        assert!(dto.validate().is_err());
    }
}
