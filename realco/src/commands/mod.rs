// realco/src/commands/mod.rs

pub mod lookup;
pub mod query;
pub mod schemas;
pub mod smoke;
pub mod sources;
pub mod verify;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use realco_core::application::{ArtifactPolicy, Dashboard};
use realco_core::infrastructure::adapters::DatabricksHttpDriver;
use realco_core::infrastructure::config::ConfigInputs;

/// Resolve configuration from the process environment and wire the HTTP driver.
pub async fn bootstrap(artifact: &Path, policy: ArtifactPolicy) -> anyhow::Result<Dashboard> {
    debug!(artifact = %artifact.display(), ?policy, "Bootstrapping dashboard");
    Dashboard::bootstrap(
        Arc::new(DatabricksHttpDriver::new()),
        &ConfigInputs::from_env(),
        artifact,
        policy,
    )
    .await
    .with_context(|| format!("Failed to load discovery artifact {}", artifact.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
