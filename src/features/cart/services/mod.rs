mod cart_service;

pub use cart_service::{load_cart_lines, lock_cart, CartService};
