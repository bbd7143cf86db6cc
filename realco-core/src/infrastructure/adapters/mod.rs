// realco-core/src/infrastructure/adapters/mod.rs

pub mod databricks;
pub mod mock;

pub use databricks::DatabricksHttpDriver;
