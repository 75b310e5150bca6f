use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::cart::dtos::CartViewDto;
use crate::features::orders::models::{Order, OrderItem, OrderStatus, OrderSummary};
use crate::shared::constants::{DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{trim_in_place, trim_optional, validate_not_blank, PHONE_REGEX};

/// Shipping and contact details submitted at checkout
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequestDto {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "First name must be at most 100 characters")
    )]
    pub first_name: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Last name must be at most 100 characters")
    )]
    pub last_name: String,

    #[validate(
        custom(function = "validate_not_blank"),
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,

    /// Exactly 10 digits
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Phone number must be exactly 10 digits"
    ))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "Telephone must be at most 20 characters"))]
    pub telephone: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Company must be at most 200 characters"))]
    pub company: Option<String>,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 300, message = "Address must be at most 300 characters")
    )]
    pub address: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "City must be at most 100 characters")
    )]
    pub city: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "State must be at most 100 characters")
    )]
    pub state: String,

    /// Defaults to "india"
    #[serde(default)]
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Postcode must be at most 20 characters"))]
    pub postcode: Option<String>,

    #[serde(default)]
    pub order_notes: Option<String>,
}

impl CheckoutRequestDto {
    /// Trim every field; blank optional fields become `None`
    pub fn normalize(mut self) -> Self {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
        trim_in_place(&mut self.email);
        trim_in_place(&mut self.phone);
        trim_in_place(&mut self.address);
        trim_in_place(&mut self.city);
        trim_in_place(&mut self.state);
        self.telephone = trim_optional(self.telephone);
        self.company = trim_optional(self.company);
        self.country = trim_optional(self.country);
        self.postcode = trim_optional(self.postcode);
        self.order_notes = trim_optional(self.order_notes);
        self
    }

    pub fn country_or_default(&self) -> &str {
        self.country.as_deref().unwrap_or(DEFAULT_COUNTRY)
    }
}

/// Cart review shown before placing the order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSummaryDto {
    pub cart: CartViewDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    pub id: Uuid,
    /// Absent once the product has been deleted from the catalog
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            subtotal: item.price * Decimal::from(item.quantity),
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Full order with its lines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub telephone: Option<String>,
    pub company: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postcode: Option<String>,
    pub order_notes: Option<String>,
    #[schema(value_type = String, example = "47.97")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponseDto {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            first_name: order.first_name,
            last_name: order.last_name,
            email: order.email,
            phone: order.phone,
            telephone: order.telephone,
            company: order.company,
            address: order.address,
            city: order.city,
            state: order.state,
            country: order.country,
            postcode: order.postcode,
            order_notes: order.order_notes,
            total_amount: order.total_amount,
            status: order.status,
            items: items.into_iter().map(OrderItemDto::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Order row for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummaryDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub customer_name: String,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<OrderSummary> for OrderSummaryDto {
    fn from(o: OrderSummary) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            username: o.username,
            customer_name: format!("{} {}", o.first_name, o.last_name),
            total_amount: o.total_amount,
            status: o.status,
            item_count: o.item_count,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,
}

/// Query params for the back-office order list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminOrderQueryParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,
    /// Number of items per page (default: 10, max: 100)
    pub page_size: Option<i64>,
    /// Only orders in this status
    pub status: Option<OrderStatus>,
}

impl AdminOrderQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::field_messages;

    fn valid_checkout() -> CheckoutRequestDto {
        CheckoutRequestDto {
            first_name: " Asha ".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: " 9876543210 ".to_string(),
            telephone: Some("".to_string()),
            company: None,
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: Some("  ".to_string()),
            postcode: None,
            order_notes: None,
        }
    }

    #[test]
    fn test_normalized_checkout_is_valid() {
        let dto = valid_checkout().normalize();

        assert!(dto.validate().is_ok());
        assert_eq!(dto.first_name, "Asha");
        assert_eq!(dto.phone, "9876543210");
        assert_eq!(dto.telephone, None);
        assert_eq!(dto.country_or_default(), "india");
    }

    #[test]
    fn test_phone_must_be_ten_digits() {
        for phone in ["987654321", "98765432100", "98765-43210", "+919876543210", "phone"] {
            let mut dto = valid_checkout();
            dto.phone = phone.to_string();
            let errors = dto.normalize().validate().unwrap_err();
            assert_eq!(
                field_messages(&errors),
                vec!["phone: Phone number must be exactly 10 digits".to_string()],
                "phone {:?} should be rejected",
                phone
            );
        }
    }

    #[test]
    fn test_required_fields_reported_per_field() {
        let mut dto = valid_checkout();
        dto.city = "   ".to_string();
        dto.last_name = String::new();

        let errors = dto.normalize().validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("city"));
        assert!(fields.contains_key("last_name"));
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_overlong_address_fields_rejected() {
        let mut dto = valid_checkout();
        dto.city = "c".repeat(150);
        dto.state = "s".repeat(150);
        dto.country = Some("z".repeat(150));
        dto.email = format!("{}@example.com", "a".repeat(120));

        let errors = dto.normalize().validate().unwrap_err();
        let fields = errors.field_errors();

        for field in ["city", "state", "country", "email"] {
            assert!(fields.contains_key(field), "{} should be rejected", field);
        }
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_address_fields_at_column_width_pass() {
        let mut dto = valid_checkout();
        dto.city = "c".repeat(100);
        dto.state = "s".repeat(100);
        dto.country = Some("z".repeat(100));

        assert!(dto.normalize().validate().is_ok());
    }

    #[test]
    fn test_admin_order_pagination_clamps_page() {
        let params = AdminOrderQueryParams {
            page: Some(i64::MAX),
            page_size: None,
            status: None,
        };
        let pagination = params.pagination();

        assert_eq!(pagination.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(
            pagination.offset(),
            (crate::shared::constants::MAX_PAGE - 1) * DEFAULT_PAGE_SIZE
        );
    }
}
