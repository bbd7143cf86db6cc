// realco-core/src/infrastructure/config/active_sources.rs

use std::path::Path;
use tracing::{debug, instrument};

use crate::domain::configuration::DatabricksConfig;
use crate::domain::sources::{ActiveSourcesDoc, UnifiedSourceConfig, merge_unified_sources};
use crate::infrastructure::error::InfrastructureError;

/// Where the discovery tooling drops its recommendation, relative to the working dir.
pub const DEFAULT_ARTIFACT_PATH: &str = "docs/active_sources.json";

/// Read the discovery artifact. A missing file is `Ok(None)`.
pub async fn read_active_sources(
    path: &Path,
) -> Result<Option<ActiveSourcesDoc>, InfrastructureError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(InfrastructureError::Io(e)),
    };

    let doc: ActiveSourcesDoc = serde_json::from_str(&content)?;
    Ok(Some(doc))
}

/// Best-effort variant: any read or parse failure counts as "no artifact".
pub async fn try_read_active_sources(path: &Path) -> Option<ActiveSourcesDoc> {
    match read_active_sources(path).await {
        Ok(doc) => doc,
        Err(e) => {
            debug!(path = ?path, error = %e, "Ignoring unreadable discovery artifact");
            None
        }
    }
}

/// Overrides from `config`, completed by the artifact at `artifact_path` when present.
#[instrument(skip(config))]
pub async fn resolve_unified_sources(
    config: &DatabricksConfig,
    artifact_path: &Path,
) -> UnifiedSourceConfig {
    let active = try_read_active_sources(artifact_path).await;
    let sources = merge_unified_sources(config, active.as_ref());
    debug!(
        missing = ?sources.missing(),
        warnings = sources.warnings.len(),
        "Resolved unified sources"
    );
    sources
}
