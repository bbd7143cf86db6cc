// realco-core/src/application/catalog.rs

// Metadata helpers over SHOW / DESCRIBE. In mock mode they all come back empty,
// since the mock responder answers metadata statements with no rows.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::executor::WarehouseClient;
use crate::domain::rows::{lookup, text};
use crate::infrastructure::error::WarehouseError;

const SCHEMA_NAME: &[&str] = &["databaseName", "namespace", "schema_name", "name"];
const TABLE_NAME: &[&str] = &["tableName", "table_name", "name"];
const COLUMN_NAME: &[&str] = &["col_name", "column_name", "name"];
const COLUMN_TYPE: &[&str] = &["data_type", "type"];

/// Schema names worth probing for dashboard sources.
const CANDIDATE_HINTS: [&str; 4] = ["dld", "monday", "gold", "default"];

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub data_type: String,
}

pub async fn list_schemas(
    client: &WarehouseClient,
    catalog: &str,
) -> Result<Vec<String>, WarehouseError> {
    let rows = client
        .execute_read_only(&format!("SHOW SCHEMAS IN {catalog}"))
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| text(lookup(row, SCHEMA_NAME)))
        .collect())
}

pub async fn list_tables(
    client: &WarehouseClient,
    catalog: &str,
    schema: &str,
) -> Result<Vec<String>, WarehouseError> {
    let rows = client
        .execute_read_only(&format!("SHOW TABLES IN {catalog}.{schema}"))
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| text(lookup(row, TABLE_NAME)))
        .collect())
}

/// Column names and types of `table`.
///
/// `DESCRIBE TABLE` appends partitioning and detail sections after the columns,
/// each introduced by a `#` row; everything from the first marker on is dropped.
#[instrument(skip(client))]
pub async fn describe_table(
    client: &WarehouseClient,
    table: &str,
) -> Result<Vec<ColumnDescription>, WarehouseError> {
    let rows = client
        .execute_read_only(&format!("DESCRIBE TABLE {table}"))
        .await?;

    let mut columns = Vec::new();
    for row in &rows {
        let Some(name) = text(lookup(row, COLUMN_NAME)) else {
            continue;
        };
        if name.starts_with('#') {
            break;
        }
        columns.push(ColumnDescription {
            name,
            data_type: text(lookup(row, COLUMN_TYPE)).unwrap_or_default(),
        });
    }

    debug!(columns = columns.len(), "Described table");
    Ok(columns)
}

/// `preferred` first (when set), then every listed schema matching a source hint.
pub async fn find_candidate_schemas(
    client: &WarehouseClient,
    catalog: &str,
    preferred: Option<&str>,
) -> Result<Vec<String>, WarehouseError> {
    let schemas = list_schemas(client, catalog).await?;
    Ok(rank_candidates(schemas, preferred))
}

fn rank_candidates(schemas: Vec<String>, preferred: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = preferred
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .into_iter()
        .collect();

    for schema in schemas {
        let lowered = schema.to_lowercase();
        if CANDIDATE_HINTS.iter().any(|hint| lowered.contains(hint)) && !candidates.contains(&schema) {
            candidates.push(schema);
        }
    }
    candidates
}
