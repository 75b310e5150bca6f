pub mod cart_handler;
pub mod guest_cart_handler;

pub use cart_handler::*;
pub use guest_cart_handler::*;
