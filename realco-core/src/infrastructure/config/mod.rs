// realco-core/src/infrastructure/config/mod.rs

pub mod active_sources;
pub mod databricks;

pub use crate::domain::configuration::DatabricksConfig;
pub use active_sources::{
    DEFAULT_ARTIFACT_PATH, resolve_unified_sources, try_read_active_sources,
};
pub use databricks::{ConfigInputs, resolve_config};
