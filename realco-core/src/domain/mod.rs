// realco-core/src/domain/mod.rs

pub mod configuration;
pub mod rows;
pub mod sources;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use configuration::{DatabricksConfig, DatabricksMode, TableOverrides};
pub use rows::{BuildingRow, MondayContactRow, OwnerRow, TransactionRow};
pub use sources::{ActiveSourcesDoc, UnifiedSource, UnifiedSourceConfig};
