mod order;

pub use order::{Order, OrderItem, OrderStatus, OrderSummary};
