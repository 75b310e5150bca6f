//! Modules layer - start-up tasks that sit outside the request path

pub mod bootstrap;
