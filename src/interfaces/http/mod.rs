//! HTTP surface: the order-creation proxy.

pub mod error;
pub mod routes;

pub use routes::{AppState, create_router};
