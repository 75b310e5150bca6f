//! Product catalog: shop browsing and product administration.

pub mod dtos;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProductService;
