//! User accounts: persistence, admin listing/deletion and password changes.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
