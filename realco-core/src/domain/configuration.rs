// realco-core/src/domain/configuration.rs

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::ConnectParams;

pub const DEFAULT_CATALOG: &str = "workspace";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 12_000;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabricksMode {
    Live,
    #[default]
    Mock,
}

impl DatabricksMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabricksMode::Live => "live",
            DatabricksMode::Mock => "mock",
        }
    }
}

impl fmt::Display for DatabricksMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit per-dataset table names taken from configuration inputs.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct TableOverrides {
    pub buildings: Option<String>,
    pub transactions: Option<String>,
    pub monday: Option<String>,
    pub owners: Option<String>,
}

/// Warehouse settings resolved from one snapshot of the configuration inputs.
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct DatabricksConfig {
    pub host: String,
    pub http_path: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub catalog: String,
    pub preferred_schema: Option<String>,
    pub tables: TableOverrides,
    pub mode: DatabricksMode,
    pub connect_timeout_ms: u64,
    pub query_timeout_ms: u64,
}

impl Default for DatabricksConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            http_path: String::new(),
            token: String::new(),
            catalog: DEFAULT_CATALOG.to_string(),
            preferred_schema: None,
            tables: TableOverrides::default(),
            mode: DatabricksMode::Mock,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for DatabricksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksConfig")
            .field("host", &self.host)
            .field("http_path", &self.http_path)
            .field("token", &if self.token.is_empty() { "" } else { "***REDACTED***" })
            .field("catalog", &self.catalog)
            .field("preferred_schema", &self.preferred_schema)
            .field("tables", &self.tables)
            .field("mode", &self.mode)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .finish()
    }
}

impl DatabricksConfig {
    pub fn is_live(&self) -> bool {
        self.mode == DatabricksMode::Live
    }

    pub fn assert_live(&self) -> Result<&Self, WarehouseError> {
        if self.is_live() {
            Ok(self)
        } else {
            Err(WarehouseError::configuration(
                "Databricks is not configured. Set DATABRICKS_HOST, DATABRICKS_HTTP_PATH, and DATABRICKS_TOKEN (or DATABRICKS_MODE=live).",
            ))
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn connect_params(&self) -> ConnectParams {
        ConnectParams {
            host: self.host.clone(),
            http_path: self.http_path.clone(),
            token: self.token.clone(),
            socket_timeout_ms: self.query_timeout_ms,
        }
    }
}
