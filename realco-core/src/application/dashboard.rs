// realco-core/src/application/dashboard.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::connectivity::ConnectivityVerifier;
use crate::application::executor::WarehouseClient;
use crate::application::queries::QueryRegistry;
use crate::domain::sources::{UnifiedSourceConfig, merge_unified_sources};
use crate::error::RealcoError;
use crate::infrastructure::config::active_sources::{read_active_sources, resolve_unified_sources};
use crate::infrastructure::config::databricks::{ConfigInputs, resolve_config};
use crate::ports::warehouse::WarehouseDriver;

/// How a present-but-unreadable discovery artifact is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArtifactPolicy {
    /// Treat it as absent.
    #[default]
    BestEffort,
    /// Fail the bootstrap.
    Strict,
}

/// Everything a dashboard process shares: one client (hence one connection) and
/// the unified sources resolved at startup.
pub struct Dashboard {
    client: Arc<WarehouseClient>,
    sources: UnifiedSourceConfig,
}

impl Dashboard {
    #[instrument(skip(driver, inputs))]
    pub async fn bootstrap(
        driver: Arc<dyn WarehouseDriver>,
        inputs: &ConfigInputs,
        artifact_path: &Path,
        policy: ArtifactPolicy,
    ) -> Result<Self, RealcoError> {
        let config = resolve_config(inputs);

        let sources = match policy {
            ArtifactPolicy::BestEffort => resolve_unified_sources(&config, artifact_path).await,
            ArtifactPolicy::Strict => {
                let active = read_active_sources(artifact_path).await?;
                merge_unified_sources(&config, active.as_ref())
            }
        };

        for warning in &sources.warnings {
            warn!("{warning}");
        }
        info!(mode = %config.mode, missing = ?sources.missing(), "Dashboard configured");

        Ok(Self {
            client: Arc::new(WarehouseClient::new(driver, config)),
            sources,
        })
    }

    pub fn client(&self) -> &Arc<WarehouseClient> {
        &self.client
    }

    pub fn sources(&self) -> &UnifiedSourceConfig {
        &self.sources
    }

    pub fn queries(&self) -> QueryRegistry {
        QueryRegistry::new(Arc::clone(&self.client), self.sources.clone())
    }

    pub fn verifier(&self) -> ConnectivityVerifier {
        ConnectivityVerifier::new(Arc::clone(&self.client), self.sources.clone())
    }
}
