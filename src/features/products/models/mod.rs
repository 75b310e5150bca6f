mod product;

pub use product::{Product, PRODUCT_SELECT};
