use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::cart::{dtos as cart_dtos, handlers as cart_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::features::products::{
    dtos as products_dtos, filter as products_filter, handlers as products_handlers,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::admin_login,
        auth::handlers::get_me,
        // Catalog (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        products_handlers::shop,
        products_handlers::product_detail,
        // Guest cart (public)
        cart_handlers::get_guest_cart,
        cart_handlers::add_guest_cart_item,
        cart_handlers::update_guest_cart_item,
        cart_handlers::remove_guest_cart_item,
        cart_handlers::clear_guest_cart,
        // Cart (protected)
        cart_handlers::get_cart,
        cart_handlers::get_cart_count,
        cart_handlers::add_cart_item,
        cart_handlers::update_cart_item,
        cart_handlers::remove_cart_item,
        cart_handlers::clear_cart,
        // Checkout and orders (protected)
        orders_handlers::checkout_summary,
        orders_handlers::checkout,
        orders_handlers::list_my_orders,
        orders_handlers::get_my_order,
        // Admin
        admin_handlers::get_dashboard,
        users_handlers::list_users,
        users_handlers::delete_user,
        users_handlers::change_password,
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        categories_handlers::admin_list_categories,
        categories_handlers::admin_get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        orders_handlers::list_orders,
        orders_handlers::get_order,
        orders_handlers::update_order_status,
        orders_handlers::delete_order,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Users
            users_dtos::UserResponseDto,
            users_dtos::ChangePasswordDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryRequestDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Products
            products_filter::ShopSort,
            products_dtos::ProductResponseDto,
            products_dtos::ProductRequestDto,
            products_dtos::ProductDetailDto,
            products_dtos::ShopPageDto,
            products_dtos::PageInfo,
            products_dtos::PriceRangeDto,
            ApiResponse<products_dtos::ShopPageDto>,
            ApiResponse<products_dtos::ProductDetailDto>,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            // Cart
            cart_dtos::CartLineDto,
            cart_dtos::CartViewDto,
            cart_dtos::CartCountDto,
            cart_dtos::GuestCartResponseDto,
            cart_dtos::AddToCartDto,
            cart_dtos::UpdateCartItemDto,
            cart_dtos::CartMergeSummaryDto,
            ApiResponse<cart_dtos::CartViewDto>,
            ApiResponse<cart_dtos::CartCountDto>,
            ApiResponse<cart_dtos::GuestCartResponseDto>,
            // Orders
            orders_models::OrderStatus,
            orders_dtos::CheckoutRequestDto,
            orders_dtos::CheckoutSummaryDto,
            orders_dtos::OrderItemDto,
            orders_dtos::OrderResponseDto,
            orders_dtos::OrderSummaryDto,
            orders_dtos::UpdateOrderStatusDto,
            ApiResponse<orders_dtos::CheckoutSummaryDto>,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<Vec<orders_dtos::OrderSummaryDto>>,
            // Admin
            admin_dtos::DashboardCountsDto,
            admin_dtos::DashboardDto,
            ApiResponse<admin_dtos::DashboardDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "categories", description = "Product categories (public)"),
        (name = "shop", description = "Catalog browsing (public)"),
        (name = "cart", description = "Guest and account shopping carts"),
        (name = "orders", description = "Checkout and order history"),
        (name = "admin", description = "Back-office endpoints (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Catalog, cart, checkout and back-office API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_storefront_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/shop",
            "/api/cart/guest",
            "/api/checkout",
            "/api/admin/orders/{id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Shop".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Shop");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
