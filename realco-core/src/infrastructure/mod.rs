// realco-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod connection;
pub mod error;

pub use connection::{ConnectionManager, with_timeout};
pub use error::{ErrorCategory, WarehouseError};
