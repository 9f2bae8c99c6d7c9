//! Storefront application services: durable cart persistence, shipping rate
//! resolution, configuration and logging bootstrap.

pub mod carts;
pub mod config;
pub mod context;
pub mod observability;
pub mod shipping;
