pub mod admin_product_handler;
pub mod shop_handler;

pub use admin_product_handler::*;
pub use shop_handler::*;
