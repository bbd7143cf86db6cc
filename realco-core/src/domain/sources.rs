// realco-core/src/domain/sources.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::configuration::DatabricksConfig;

pub const DEFAULT_MONDAY_CONTACTS_TABLE: &str = "workspace.default.v_monday_crm_contact_profile";

pub const OWNERS_FALLBACK_WARNING: &str =
    "Owners source not explicitly configured; using Monday contacts source as fallback.";

pub const MONDAY_DEFAULT_WARNING: &str =
    "Monday contacts source not configured; using the default contact profile view.";

/// The four logical datasets the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnifiedSource {
    DldTransactionsTable,
    DldBuildingsTable,
    MondayContactsTable,
    OwnersTable,
}

impl UnifiedSource {
    pub const ALL: [UnifiedSource; 4] = [
        UnifiedSource::DldTransactionsTable,
        UnifiedSource::DldBuildingsTable,
        UnifiedSource::MondayContactsTable,
        UnifiedSource::OwnersTable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnifiedSource::DldTransactionsTable => "dldTransactionsTable",
            UnifiedSource::DldBuildingsTable => "dldBuildingsTable",
            UnifiedSource::MondayContactsTable => "mondayContactsTable",
            UnifiedSource::OwnersTable => "ownersTable",
        }
    }

    /// Environment key an operator sets to configure this dataset explicitly.
    pub fn env_key(self) -> &'static str {
        match self {
            UnifiedSource::DldTransactionsTable => "DATABRICKS_TABLE_TRANSACTIONS",
            UnifiedSource::DldBuildingsTable => "DATABRICKS_TABLE_BUILDINGS",
            UnifiedSource::MondayContactsTable => "DATABRICKS_TABLE_MONDAY",
            UnifiedSource::OwnersTable => "DATABRICKS_TABLE_OWNERS",
        }
    }
}

impl fmt::Display for UnifiedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical table per logical dataset. An empty string means "unresolved".
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSourceConfig {
    pub dld_transactions_table: String,
    pub dld_buildings_table: String,
    pub monday_contacts_table: String,
    pub owners_table: String,
    pub warnings: Vec<String>,
}

impl UnifiedSourceConfig {
    pub fn table(&self, source: UnifiedSource) -> &str {
        match source {
            UnifiedSource::DldTransactionsTable => &self.dld_transactions_table,
            UnifiedSource::DldBuildingsTable => &self.dld_buildings_table,
            UnifiedSource::MondayContactsTable => &self.monday_contacts_table,
            UnifiedSource::OwnersTable => &self.owners_table,
        }
    }

    /// Datasets whose table could not be resolved, in declaration order.
    pub fn missing(&self) -> Vec<UnifiedSource> {
        UnifiedSource::ALL
            .into_iter()
            .filter(|source| self.table(*source).is_empty())
            .collect()
    }
}

/// Discovery artifact written by the schema scoring tooling.
///
/// Fields stay loosely typed: a value of the wrong JSON type is ignored on its own
/// instead of invalidating the whole document.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ActiveSourcesDoc {
    #[serde(default)]
    pub transactions_source: Option<Value>,
    #[serde(default)]
    pub buildings_source: Option<Value>,
    #[serde(default)]
    pub monday_sources: Option<Value>,
    #[serde(default)]
    pub owners_source: Option<Value>,
}

impl ActiveSourcesDoc {
    pub fn transactions_source(&self) -> Option<String> {
        self.transactions_source.as_ref().and_then(non_empty_value)
    }

    pub fn buildings_source(&self) -> Option<String> {
        self.buildings_source.as_ref().and_then(non_empty_value)
    }

    pub fn owners_source(&self) -> Option<String> {
        self.owners_source.as_ref().and_then(non_empty_value)
    }

    /// First usable entry of `monday_sources`.
    pub fn first_monday_source(&self) -> Option<String> {
        match &self.monday_sources {
            Some(Value::Array(candidates)) => candidates.iter().find_map(non_empty_value),
            _ => None,
        }
    }
}

fn non_empty_value(value: &Value) -> Option<String> {
    value.as_str().and_then(non_empty)
}

pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn explicit(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

/// Merge explicit overrides with the discovery artifact.
///
/// Precedence per dataset: override, then artifact, then (contacts) the built-in view
/// or (owners) the resolved contacts table, then empty.
pub fn merge_unified_sources(
    config: &DatabricksConfig,
    active: Option<&ActiveSourcesDoc>,
) -> UnifiedSourceConfig {
    let mut warnings = Vec::new();
    let tables = &config.tables;

    let dld_transactions_table = explicit(&tables.transactions)
        .or_else(|| active.and_then(ActiveSourcesDoc::transactions_source))
        .unwrap_or_default();

    let dld_buildings_table = explicit(&tables.buildings)
        .or_else(|| active.and_then(ActiveSourcesDoc::buildings_source))
        .unwrap_or_default();

    let monday_contacts_table = explicit(&tables.monday)
        .or_else(|| active.and_then(ActiveSourcesDoc::first_monday_source))
        .unwrap_or_else(|| {
            warnings.push(MONDAY_DEFAULT_WARNING.to_string());
            DEFAULT_MONDAY_CONTACTS_TABLE.to_string()
        });

    let owners_table = match explicit(&tables.owners)
        .or_else(|| active.and_then(ActiveSourcesDoc::owners_source))
    {
        Some(table) => table,
        None => {
            warnings.push(OWNERS_FALLBACK_WARNING.to_string());
            monday_contacts_table.clone()
        }
    };

    UnifiedSourceConfig {
        dld_transactions_table,
        dld_buildings_table,
        monday_contacts_table,
        owners_table,
        warnings,
    }
}
