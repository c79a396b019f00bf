//! Larder Orders: order creation, pricing and lifecycle transitions,
//! plus validated catalog access.
//!
//! Services are generic over the repository traits in `larder-core`
//! and bound every store call with a timeout.

pub mod catalog;
pub mod config;
pub mod number;
pub mod service;
mod store;

pub use catalog::CatalogService;
pub use config::OrderConfig;
pub use service::OrderService;
