//! Checkout and orders.
//!
//! Checkout converts the persisted cart into an immutable order snapshot in a
//! single transaction. After creation only the status of an order changes, and
//! only along the pending → processing → completed path (or to cancelled).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod snapshot;

pub use services::OrderService;
