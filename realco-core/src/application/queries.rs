// realco-core/src/application/queries.rs

//! Dashboard queries: SQL assembled against the resolved unified sources, run
//! through the read-only client and adapted into domain rows.
//!
//! User input only ever reaches the SQL as a quoted literal passed through
//! [`escape_sql`]. Table names come from configuration, never from callers.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::application::executor::WarehouseClient;
use crate::domain::rows::{BuildingRow, MondayContactRow, OwnerRow, TransactionRow};
use crate::domain::sources::{UnifiedSource, UnifiedSourceConfig};
use crate::infrastructure::adapters::mock::{mock_buildings, mock_transactions};
use crate::infrastructure::error::WarehouseError;

pub const DEFAULT_UNIT_LIMIT: usize = 10;
pub const DEFAULT_TRANSACTION_LIMIT: usize = 50;
pub const DEFAULT_TREND_LIMIT: usize = 200;
pub const DEFAULT_OWNER_LIMIT: usize = 100;
pub const DEFAULT_CONTACT_LIMIT: usize = 100;

/// Double single quotes so `value` can sit inside a SQL string literal.
pub fn escape_sql(value: &str) -> String {
    value.replace('\'', "''")
}

fn limit_or(limit: usize, default: usize) -> usize {
    if limit == 0 { default } else { limit }
}

fn contains_ci(value: Option<&str>, needle_lower: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(needle_lower))
}

pub struct QueryRegistry {
    client: Arc<WarehouseClient>,
    sources: UnifiedSourceConfig,
}

impl QueryRegistry {
    pub fn new(client: Arc<WarehouseClient>, sources: UnifiedSourceConfig) -> Self {
        Self { client, sources }
    }

    pub fn sources(&self) -> &UnifiedSourceConfig {
        &self.sources
    }

    fn table(&self, source: UnifiedSource) -> Result<&str, WarehouseError> {
        let table = self.sources.table(source);
        if table.is_empty() {
            return Err(WarehouseError::configuration(format!(
                "Missing {} for live Databricks queries.",
                source.env_key()
            )));
        }
        Ok(table)
    }

    /// Buildings whose area, project or property id contains `query`.
    #[instrument(skip(self))]
    pub async fn unit_candidates(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<BuildingRow>, WarehouseError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit_or(limit, DEFAULT_UNIT_LIMIT);

        if !self.client.is_live() {
            let lower = query.to_lowercase();
            return Ok(mock_buildings()
                .into_iter()
                .filter(|b| {
                    contains_ci(b.property_id.as_deref(), &lower)
                        || contains_ci(b.area_name_en.as_deref(), &lower)
                        || contains_ci(b.project_name_en.as_deref(), &lower)
                })
                .take(limit)
                .collect());
        }

        let table = self.table(UnifiedSource::DldBuildingsTable)?;
        let escaped = escape_sql(query);
        let sql = format!(
            "SELECT * FROM {table} \
             WHERE lower(area_name_en) LIKE lower('%{escaped}%') \
             OR lower(project_name_en) LIKE lower('%{escaped}%') \
             OR CAST(property_id AS STRING) LIKE '%{escaped}%' \
             LIMIT {limit}"
        );

        let rows = self.client.execute_read_only(&sql).await?;
        Ok(rows
            .iter()
            .map(BuildingRow::adapt)
            .filter(|b| b.property_id.is_some())
            .collect())
    }

    /// Transaction history of one property, newest first.
    #[instrument(skip(self))]
    pub async fn transactions_for_unit(
        &self,
        property_id: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRow>, WarehouseError> {
        let property_id = property_id.trim();
        if property_id.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit_or(limit, DEFAULT_TRANSACTION_LIMIT);

        if !self.client.is_live() {
            return Ok(mock_transactions()
                .into_iter()
                .filter(|t| t.property_id.as_deref() == Some(property_id))
                .take(limit)
                .collect());
        }

        let table = self.table(UnifiedSource::DldTransactionsTable)?;
        let sql = format!(
            "SELECT * FROM {table} \
             WHERE CAST(property_id AS STRING) = '{}' \
             ORDER BY instance_date DESC \
             LIMIT {limit}",
            escape_sql(property_id)
        );

        let rows = self.client.execute_read_only(&sql).await?;
        Ok(rows.iter().map(TransactionRow::adapt).collect())
    }

    /// Transactions in areas matching `area`, optionally bounded by ISO dates (inclusive).
    #[instrument(skip(self))]
    pub async fn area_trends(
        &self,
        area: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: usize,
    ) -> Result<Vec<TransactionRow>, WarehouseError> {
        let area = area.trim();
        if area.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit_or(limit, DEFAULT_TREND_LIMIT);
        let start_date = start_date.map(str::trim).filter(|d| !d.is_empty());
        let end_date = end_date.map(str::trim).filter(|d| !d.is_empty());

        if !self.client.is_live() {
            let lower = area.to_lowercase();
            return Ok(mock_transactions()
                .into_iter()
                .filter(|t| contains_ci(t.area_name_en.as_deref(), &lower))
                .filter(|t| {
                    let date = t.instance_date.as_deref().unwrap_or_default();
                    start_date.is_none_or(|s| date >= s) && end_date.is_none_or(|e| date <= e)
                })
                .take(limit)
                .collect());
        }

        let table = self.table(UnifiedSource::DldTransactionsTable)?;
        let mut filters = vec![format!(
            "lower(area_name_en) LIKE lower('%{}%')",
            escape_sql(area)
        )];
        if let Some(start) = start_date {
            filters.push(format!("instance_date >= DATE('{}')", escape_sql(start)));
        }
        if let Some(end) = end_date {
            filters.push(format!("instance_date <= DATE('{}')", escape_sql(end)));
        }
        let sql = format!(
            "SELECT * FROM {table} WHERE {} ORDER BY instance_date DESC LIMIT {limit}",
            filters.join(" AND ")
        );

        let rows = self.client.execute_read_only(&sql).await?;
        Ok(rows.iter().map(TransactionRow::adapt).collect())
    }

    /// Owners carrying at least an id or a name.
    #[instrument(skip(self))]
    pub async fn owners(&self, limit: usize) -> Result<Vec<OwnerRow>, WarehouseError> {
        if !self.client.is_live() {
            warn!("Owners are not available in mock mode");
            return Ok(Vec::new());
        }

        let table = self.table(UnifiedSource::OwnersTable)?;
        let sql = format!(
            "SELECT * FROM {table} LIMIT {}",
            limit_or(limit, DEFAULT_OWNER_LIMIT)
        );

        let rows = self.client.execute_read_only(&sql).await?;
        Ok(rows
            .iter()
            .map(OwnerRow::adapt)
            .filter(OwnerRow::is_identifiable)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn monday_contacts(
        &self,
        limit: usize,
    ) -> Result<Vec<MondayContactRow>, WarehouseError> {
        if !self.client.is_live() {
            warn!("Monday contacts are not available in mock mode");
            return Ok(Vec::new());
        }

        let table = self.table(UnifiedSource::MondayContactsTable)?;
        let sql = format!(
            "SELECT * FROM {table} ORDER BY first_seen_at DESC LIMIT {}",
            limit_or(limit, DEFAULT_CONTACT_LIMIT)
        );

        let rows = self.client.execute_read_only(&sql).await?;
        Ok(rows.iter().map(MondayContactRow::adapt).collect())
    }
}
