// realco-core/src/infrastructure/config/databricks.rs

use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::domain::configuration::{
    DEFAULT_CATALOG, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_QUERY_TIMEOUT_MS, DatabricksConfig,
    DatabricksMode, TableOverrides,
};

const HOST_KEYS: &[&str] = &["DATABRICKS_HOST", "DATABRICKS_SERVER_HOSTNAME"];
const HTTP_PATH_KEYS: &[&str] = &["DATABRICKS_HTTP_PATH", "DATABRICKS_WAREHOUSE_HTTP_PATH"];
const TOKEN_KEYS: &[&str] = &["DATABRICKS_TOKEN"];
const CATALOG_KEYS: &[&str] = &["DATABRICKS_CATALOG"];
const SCHEMA_KEYS: &[&str] = &["DATABRICKS_SCHEMA", "DATABRICKS_PREFERRED_SCHEMA"];
const BUILDINGS_TABLE_KEYS: &[&str] = &["DATABRICKS_TABLE_BUILDINGS"];
const TRANSACTIONS_TABLE_KEYS: &[&str] = &["DATABRICKS_TABLE_TRANSACTIONS"];
const MONDAY_TABLE_KEYS: &[&str] = &["DATABRICKS_TABLE_MONDAY"];
const OWNERS_TABLE_KEYS: &[&str] = &["DATABRICKS_TABLE_OWNERS", "DATABRICKS_OWNERS_TABLE"];
const MODE_KEYS: &[&str] = &["DATABRICKS_MODE"];
const CONNECT_TIMEOUT_KEYS: &[&str] = &["DATABRICKS_CONNECT_TIMEOUT_MS"];
const QUERY_TIMEOUT_KEYS: &[&str] = &["DATABRICKS_QUERY_TIMEOUT_MS"];

/// Environment-style key/value snapshot the resolver reads from.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    values: HashMap<String, String>,
}

impl ConfigInputs {
    pub fn from_env() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First non-blank value among `keys`, trimmed.
    pub fn first(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| {
            let value = self.values.get(*key)?.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    fn millis(&self, keys: &[&str], default: u64) -> u64 {
        match self.first(keys) {
            None => default,
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    warn!(keys = ?keys, value = %raw, default, "Ignoring invalid timeout value");
                    default
                }
            },
        }
    }
}

/// Resolve warehouse settings. Never fails and never touches the network.
///
/// Live mode needs either `DATABRICKS_MODE=live` or all of host, http path and token.
#[instrument(skip(inputs))]
pub fn resolve_config(inputs: &ConfigInputs) -> DatabricksConfig {
    let host = inputs.first(HOST_KEYS);
    let http_path = inputs.first(HTTP_PATH_KEYS);
    let token = inputs.first(TOKEN_KEYS);

    let forced_live = inputs
        .first(MODE_KEYS)
        .is_some_and(|mode| mode.eq_ignore_ascii_case("live"));
    let mode = if forced_live || (host.is_some() && http_path.is_some() && token.is_some()) {
        DatabricksMode::Live
    } else {
        DatabricksMode::Mock
    };

    let config = DatabricksConfig {
        host: host.unwrap_or_default(),
        http_path: http_path.unwrap_or_default(),
        token: token.unwrap_or_default(),
        catalog: inputs
            .first(CATALOG_KEYS)
            .unwrap_or_else(|| DEFAULT_CATALOG.to_string()),
        preferred_schema: inputs.first(SCHEMA_KEYS),
        tables: TableOverrides {
            buildings: inputs.first(BUILDINGS_TABLE_KEYS),
            transactions: inputs.first(TRANSACTIONS_TABLE_KEYS),
            monday: inputs.first(MONDAY_TABLE_KEYS),
            owners: inputs.first(OWNERS_TABLE_KEYS),
        },
        mode,
        connect_timeout_ms: inputs.millis(CONNECT_TIMEOUT_KEYS, DEFAULT_CONNECT_TIMEOUT_MS),
        query_timeout_ms: inputs.millis(QUERY_TIMEOUT_KEYS, DEFAULT_QUERY_TIMEOUT_MS),
    };

    debug!(mode = %config.mode, catalog = %config.catalog, "Resolved Databricks configuration");
    config
}
