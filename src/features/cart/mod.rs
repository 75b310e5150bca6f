//! Shopping cart: persisted per-user carts, token-carried guest carts and the
//! login-time merge between them.

pub mod dtos;
pub mod guest_cart;
pub mod handlers;
pub mod merge;
pub mod models;
pub mod routes;
pub mod services;

pub use guest_cart::{GuestCart, GuestCartCodec, OpenedGuestCart};
pub use services::CartService;
