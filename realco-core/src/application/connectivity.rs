// realco-core/src/application/connectivity.rs

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::catalog::describe_table;
use crate::application::executor::WarehouseClient;
use crate::domain::configuration::DatabricksMode;
use crate::domain::sources::{UnifiedSource, UnifiedSourceConfig};

pub const PROBE_SQL: &str = "SELECT 1 AS ok";

const MOCK_MODE_REASON: &str =
    "Databricks is running in mock mode. Configure live credentials to verify connectivity.";
const MISSING_CONFIG_REASON: &str =
    "One or more required Databricks source tables are missing from configuration.";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceCheckKey {
    DldTransactions,
    DldBuildings,
    MondayContacts,
    Owners,
}

impl SourceCheckKey {
    pub const ALL: [SourceCheckKey; 4] = [
        SourceCheckKey::DldTransactions,
        SourceCheckKey::DldBuildings,
        SourceCheckKey::MondayContacts,
        SourceCheckKey::Owners,
    ];

    pub fn source(self) -> UnifiedSource {
        match self {
            SourceCheckKey::DldTransactions => UnifiedSource::DldTransactionsTable,
            SourceCheckKey::DldBuildings => UnifiedSource::DldBuildingsTable,
            SourceCheckKey::MondayContacts => UnifiedSource::MondayContactsTable,
            SourceCheckKey::Owners => UnifiedSource::OwnersTable,
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            SourceCheckKey::DldTransactions => &["instance_date", "actual_worth"],
            SourceCheckKey::DldBuildings => &["property_id"],
            SourceCheckKey::MondayContacts => &["master_contact_id"],
            SourceCheckKey::Owners => &["owner_name"],
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SourceCheckResult {
    pub key: SourceCheckKey,
    pub table: String,
    pub ok: bool,
    pub latency_ms: u64,
    pub sample_rows: usize,
    pub missing_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ConnectivityReport {
    pub ok: bool,
    pub mode: DatabricksMode,
    pub checked_at: String,
    pub latency_ms: u64,
    pub missing_config: Vec<UnifiedSource>,
    pub warnings: Vec<String>,
    pub sources: Vec<SourceCheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectivityReport {
    /// Status a health endpoint should answer with.
    pub fn http_status(&self) -> u16 {
        if self.ok { 200 } else { 503 }
    }
}

/// Health snapshot of the warehouse and of every unified source.
pub struct ConnectivityVerifier {
    client: Arc<WarehouseClient>,
    sources: UnifiedSourceConfig,
}

impl ConnectivityVerifier {
    pub fn new(client: Arc<WarehouseClient>, sources: UnifiedSourceConfig) -> Self {
        Self { client, sources }
    }

    /// Never fails: every problem ends up in the report.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> ConnectivityReport {
        let started = Instant::now();
        let missing_config = self.sources.missing();

        if !self.client.is_live() {
            return self.failed(started, missing_config, MOCK_MODE_REASON.to_string());
        }
        if !missing_config.is_empty() {
            warn!(missing = ?missing_config, "Skipping connectivity checks");
            return self.failed(started, missing_config, MISSING_CONFIG_REASON.to_string());
        }

        if let Err(e) = self.client.execute_read_only(PROBE_SQL).await {
            warn!(error = %e, "Warehouse probe failed");
            return self.failed(started, missing_config, e.to_string());
        }

        let checks = join_all(
            SourceCheckKey::ALL
                .into_iter()
                .map(|key| self.check_source(key)),
        )
        .await;

        let ok = checks.iter().all(|check| check.ok);
        info!(ok, "Connectivity verified in {:.2?}", started.elapsed());

        ConnectivityReport {
            ok,
            mode: self.client.config().mode,
            checked_at: now_rfc3339(),
            latency_ms: elapsed_ms(started),
            missing_config,
            warnings: self.sources.warnings.clone(),
            sources: checks,
            error: None,
        }
    }

    async fn check_source(&self, key: SourceCheckKey) -> SourceCheckResult {
        let started = Instant::now();
        let table = self.sources.table(key.source()).to_string();
        let required = key.required_columns();
        let sample_sql = format!("SELECT * FROM {table} LIMIT 1");

        let outcome = futures::try_join!(
            self.client.execute_read_only(&sample_sql),
            describe_table(&self.client, &table),
        );

        match outcome {
            Ok((sample, columns)) => {
                let names: Vec<String> = columns.iter().map(|c| c.name.to_lowercase()).collect();
                let missing_columns: Vec<String> = required
                    .iter()
                    .filter(|expected| !has_column(&names, expected))
                    .map(|c| c.to_string())
                    .collect();

                SourceCheckResult {
                    key,
                    table,
                    ok: missing_columns.is_empty(),
                    latency_ms: elapsed_ms(started),
                    sample_rows: sample.len(),
                    missing_columns,
                    error: None,
                }
            }
            Err(e) => {
                warn!(?key, table = %table, error = %e, "Source check failed");
                SourceCheckResult {
                    key,
                    table,
                    ok: false,
                    latency_ms: elapsed_ms(started),
                    sample_rows: 0,
                    missing_columns: required.iter().map(|c| c.to_string()).collect(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn failed(
        &self,
        started: Instant,
        missing_config: Vec<UnifiedSource>,
        error: String,
    ) -> ConnectivityReport {
        ConnectivityReport {
            ok: false,
            mode: self.client.config().mode,
            checked_at: now_rfc3339(),
            latency_ms: elapsed_ms(started),
            missing_config,
            warnings: self.sources.warnings.clone(),
            sources: Vec::new(),
            error: Some(error),
        }
    }
}

/// Exact match, or `expected` appearing inside a (lowercased) column name.
fn has_column(names: &[String], expected: &str) -> bool {
    let expected = expected.to_lowercase();
    names.iter().any(|name| *name == expected) || names.iter().any(|name| name.contains(&expected))
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::configuration::DatabricksConfig;
    use crate::infrastructure::error::WarehouseError;
    use crate::ports::warehouse::SqlRow;
    use crate::testing::{ScriptedDriver, live_config, row};
    use serde_json::json;
    use std::time::Duration;

    const TRANSACTIONS: &str = "workspace.gold.transactions_export";
    const BUILDINGS: &str = "workspace.gold.buildings_freehold";
    const CONTACTS: &str = "workspace.crm.v_monday_contacts";
    const OWNERS: &str = "workspace.crm.owners";

    fn sources() -> UnifiedSourceConfig {
        UnifiedSourceConfig {
            dld_transactions_table: TRANSACTIONS.into(),
            dld_buildings_table: BUILDINGS.into(),
            monday_contacts_table: CONTACTS.into(),
            owners_table: OWNERS.into(),
            warnings: vec!["owners fallback".into()],
        }
    }

    fn describe(columns: &[&str]) -> Vec<SqlRow> {
        columns
            .iter()
            .map(|c| row(json!({ "col_name": c, "data_type": "string" })))
            .collect()
    }

    /// A warehouse where every table exists; owners lack a name column.
    fn warehouse(sql: &str) -> Result<Vec<SqlRow>, WarehouseError> {
        if sql == PROBE_SQL {
            return Ok(vec![row(json!({ "ok": 1 }))]);
        }
        if let Some(table) = sql.strip_prefix("DESCRIBE TABLE ") {
            return Ok(match table {
                TRANSACTIONS => describe(&["instance_date", "actual_worth", "area_name_en"]),
                BUILDINGS => describe(&["Property_ID", "area_name_en"]),
                CONTACTS => describe(&["master_contact_id", "full_name"]),
                _ => describe(&["owner_id", "email"]),
            });
        }
        Ok(vec![row(json!({ "x": 1 }))])
    }

    fn verifier(driver: ScriptedDriver, config: DatabricksConfig, sources: UnifiedSourceConfig) -> ConnectivityVerifier {
        let client = WarehouseClient::new(Arc::new(driver), config);
        ConnectivityVerifier::new(Arc::new(client), sources)
    }

    #[tokio::test]
    async fn test_missing_transactions_table_short_circuits() {
        let driver = Arc::new(ScriptedDriver::new());
        let client = WarehouseClient::new(driver.clone(), live_config());
        let sources = UnifiedSourceConfig {
            dld_transactions_table: String::new(),
            ..sources()
        };

        let report = ConnectivityVerifier::new(Arc::new(client), sources).verify().await;

        assert!(!report.ok);
        assert_eq!(report.missing_config, vec![UnifiedSource::DldTransactionsTable]);
        assert!(report.sources.is_empty());
        assert_eq!(driver.connect_count(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["missing_config"], json!(["dldTransactionsTable"]));
        assert_eq!(report.http_status(), 503);
    }

    #[tokio::test]
    async fn test_mock_mode_short_circuits() {
        let report = verifier(ScriptedDriver::new(), DatabricksConfig::default(), sources())
            .verify()
            .await;

        assert!(!report.ok);
        assert_eq!(report.mode, DatabricksMode::Mock);
        assert!(report.sources.is_empty());
        assert!(report.error.unwrap().contains("mock mode"));
    }

    #[tokio::test]
    async fn test_probe_failure_is_reported() {
        let driver = ScriptedDriver::with_handler(|_| {
            Err(WarehouseError::Query("PERMISSION_DENIED: warehouse".into()))
        });

        let report = verifier(driver, live_config(), sources()).verify().await;

        assert!(!report.ok);
        assert!(report.sources.is_empty());
        assert_eq!(report.error.as_deref(), Some("PERMISSION_DENIED: warehouse"));
    }

    #[tokio::test]
    async fn test_all_sources_checked_and_missing_columns_flagged() {
        let report = verifier(ScriptedDriver::with_handler(warehouse), live_config(), sources())
            .verify()
            .await;

        let keys: Vec<_> = report.sources.iter().map(|s| s.key).collect();
        assert_eq!(keys, SourceCheckKey::ALL.to_vec());
        assert_eq!(report.warnings, vec!["owners fallback"]);

        let by_key = |key| report.sources.iter().find(|s| s.key == key).unwrap();
        assert!(by_key(SourceCheckKey::DldTransactions).ok);
        assert!(by_key(SourceCheckKey::DldBuildings).ok);
        assert!(by_key(SourceCheckKey::MondayContacts).ok);
        assert_eq!(by_key(SourceCheckKey::DldBuildings).sample_rows, 1);

        let owners = by_key(SourceCheckKey::Owners);
        assert!(!owners.ok);
        assert_eq!(owners.missing_columns, vec!["owner_name"]);
        assert!(owners.error.is_none());

        assert!(!report.ok);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_one_failing_source_does_not_sink_the_others() {
        let driver = ScriptedDriver::with_handler(|sql| {
            if sql.contains(BUILDINGS) {
                return Err(WarehouseError::Query("[TABLE_OR_VIEW_NOT_FOUND]".into()));
            }
            if sql.contains(OWNERS) && sql.starts_with("DESCRIBE") {
                return Ok(describe(&["owner_name"]));
            }
            warehouse(sql)
        });

        let report = verifier(driver, live_config(), sources()).verify().await;

        let buildings = report
            .sources
            .iter()
            .find(|s| s.key == SourceCheckKey::DldBuildings)
            .unwrap();
        assert!(!buildings.ok);
        assert_eq!(buildings.missing_columns, vec!["property_id"]);
        assert_eq!(buildings.error.as_deref(), Some("[TABLE_OR_VIEW_NOT_FOUND]"));

        let healthy = report.sources.iter().filter(|s| s.ok).count();
        assert_eq!(healthy, 3);
        assert!(!report.ok);
    }

    /// Like `warehouse`, with an owners table that has its name column.
    fn healthy_warehouse(sql: &str) -> Result<Vec<SqlRow>, WarehouseError> {
        if sql == format!("DESCRIBE TABLE {OWNERS}") {
            return Ok(describe(&["owner_name", "email"]));
        }
        warehouse(sql)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_source_times_out_without_holding_back_the_others() {
        let driver = Arc::new(ScriptedDriver::with_handler(healthy_warehouse).hang_when(CONTACTS));
        let client = WarehouseClient::new(driver.clone(), live_config());

        let report = ConnectivityVerifier::new(Arc::new(client), sources())
            .verify()
            .await;

        let contacts = report
            .sources
            .iter()
            .find(|s| s.key == SourceCheckKey::MondayContacts)
            .unwrap();
        assert!(!contacts.ok);
        assert_eq!(contacts.sample_rows, 0);
        assert_eq!(contacts.missing_columns, vec!["master_contact_id"]);
        assert!(contacts
            .error
            .as_deref()
            .unwrap()
            .contains("Databricks fetch timed out"));

        let others: Vec<_> = report
            .sources
            .iter()
            .filter(|s| s.key != SourceCheckKey::MondayContacts)
            .collect();
        assert_eq!(others.len(), 3);
        assert!(others.iter().all(|s| s.ok && s.error.is_none()));
        assert!(!report.ok);
        assert!(report.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_checks_run_concurrently() {
        let delay = Duration::from_millis(100);
        let driver = Arc::new(ScriptedDriver::with_handler(healthy_warehouse).with_fetch_delay(delay));
        let client = WarehouseClient::new(driver.clone(), live_config());
        let verifier = ConnectivityVerifier::new(Arc::new(client), sources());

        let started = tokio::time::Instant::now();
        let report = verifier.verify().await;
        let elapsed = started.elapsed();

        assert!(report.ok);
        // the probe, then all eight sample/describe statements side by side
        assert_eq!(driver.executed().len(), 9);
        assert!(elapsed >= delay * 2, "{elapsed:?}");
        assert!(elapsed < delay * 3, "{elapsed:?}");
    }

    #[test]
    fn test_has_column_matches_exact_or_substring() {
        let names = vec!["instance_date".to_string(), "actual_worth_aed".to_string()];
        assert!(has_column(&names, "instance_date"));
        assert!(has_column(&names, "ACTUAL_WORTH"));
        assert!(!has_column(&names, "property_id"));
    }

    #[test]
    fn test_report_serializes_snake_case_keys_and_omits_empty_error() {
        let report = ConnectivityReport {
            ok: true,
            mode: DatabricksMode::Live,
            checked_at: now_rfc3339(),
            latency_ms: 12,
            missing_config: Vec::new(),
            warnings: Vec::new(),
            sources: vec![SourceCheckResult {
                key: SourceCheckKey::MondayContacts,
                table: CONTACTS.into(),
                ok: true,
                latency_ms: 3,
                sample_rows: 1,
                missing_columns: Vec::new(),
                error: None,
            }],
            error: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "live");
        assert_eq!(json["sources"][0]["key"], "monday_contacts");
        assert!(json.get("error").is_none());
        assert!(json["sources"][0].get("error").is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(json["checked_at"].as_str().unwrap()).is_ok());
        assert_eq!(report.http_status(), 200);
    }
}
