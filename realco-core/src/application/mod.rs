// realco-core/src/application/mod.rs

pub mod catalog;
pub mod connectivity;
pub mod dashboard;
pub mod executor;
pub mod queries;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire `use realco_core::application::{WarehouseClient, QueryRegistry};`
// sans connaître la structure interne des fichiers.

pub use catalog::{ColumnDescription, describe_table, find_candidate_schemas, list_schemas, list_tables};
pub use connectivity::{ConnectivityReport, ConnectivityVerifier, SourceCheckKey, SourceCheckResult};
pub use dashboard::{ArtifactPolicy, Dashboard};
pub use executor::{RetryPolicy, WarehouseClient};
pub use queries::{QueryRegistry, escape_sql};
