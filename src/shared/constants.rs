/// Default page size for admin list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Highest page number honoured by any listing; larger values are clamped
pub const MAX_PAGE: i64 = 1_000_000;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of products per shop page
pub const SHOP_DEFAULT_PER_PAGE: i64 = 9;

/// Best sellers shown next to the shop listing
pub const BEST_SELLERS_LIMIT: i64 = 3;

/// Related products shown on a product page
pub const RELATED_PRODUCTS_LIMIT: i64 = 4;

/// Recent orders shown on the admin dashboard
pub const DASHBOARD_RECENT_ORDERS: i64 = 5;

/// Upper bound for a single cart line
pub const MAX_LINE_QUANTITY: i32 = 999;

/// Minimum password length for registration and password changes
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Header carrying the signed guest cart
pub const CART_TOKEN_HEADER: &str = "x-cart-token";

/// Country recorded on an order when the checkout form leaves it empty
pub const DEFAULT_COUNTRY: &str = "india";
