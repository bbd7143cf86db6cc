// realco-core/src/infrastructure/adapters/mock.rs

// Canned answers used when no live credentials are configured. Mock mode never runs
// arbitrary SQL: only the liveness probe and metadata listings are answered.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::domain::rows::{BuildingRow, TransactionRow};
use crate::infrastructure::error::WarehouseError;
use crate::ports::warehouse::SqlRow;

#[allow(clippy::expect_used)]
static PROBE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^select 1").expect("static probe pattern"));

#[allow(clippy::expect_used)]
static METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(show|describe) ").expect("static metadata pattern"));

pub fn is_probe(sql: &str) -> bool {
    PROBE.is_match(sql.trim())
}

pub fn is_metadata(sql: &str) -> bool {
    METADATA.is_match(sql.trim())
}

pub fn mock_execute(sql: &str) -> Result<Vec<SqlRow>, WarehouseError> {
    if is_probe(sql) {
        let mut row = SqlRow::new();
        row.insert("1".to_string(), json!(1));
        return Ok(vec![row]);
    }
    if is_metadata(sql) {
        return Ok(Vec::new());
    }
    Err(WarehouseError::MockMode)
}

fn building(
    property_id: &str,
    area: &str,
    project: &str,
    building_number: &str,
    rooms: &str,
) -> BuildingRow {
    BuildingRow {
        property_id: Some(property_id.to_string()),
        area_name_en: Some(area.to_string()),
        project_name_en: Some(project.to_string()),
        building_number: Some(building_number.to_string()),
        floors: None,
        rooms_en: Some(rooms.to_string()),
        is_registered: Some("Registered".to_string()),
        land_type_en: Some("Residential".to_string()),
    }
}

/// Demo inventory served by the query registry in mock mode.
pub fn mock_buildings() -> Vec<BuildingRow> {
    vec![
        building("100231", "Palm Jumeirah", "Shoreline Apartments", "B-7", "2 B/R"),
        building("100488", "Palm Jumeirah", "Oceana Residences", "Atlantic", "3 B/R"),
        building("204117", "Dubai Marina", "Marina Gate", "Tower 1", "1 B/R"),
        building("305902", "Business Bay", "Executive Towers", "Tower H", "Studio"),
    ]
}

fn transaction(
    transaction_id: &str,
    property_id: &str,
    date: &str,
    group: &str,
    worth: f64,
    area: &str,
    project: &str,
) -> TransactionRow {
    TransactionRow {
        transaction_id: Some(transaction_id.to_string()),
        property_id: Some(property_id.to_string()),
        instance_date: Some(date.to_string()),
        trans_group_en: Some(group.to_string()),
        procedure_name_en: Some("Sell".to_string()),
        actual_worth: Some(worth),
        meter_sale_price: None,
        procedure_area: None,
        area_name_en: Some(area.to_string()),
        project_name_en: Some(project.to_string()),
        building_name_en: None,
        rooms_en: None,
    }
}

/// Demo transactions, newest first, matching `mock_buildings`.
pub fn mock_transactions() -> Vec<TransactionRow> {
    vec![
        transaction("1-102-2024-0412", "100231", "2024-03-18", "Sales", 4_150_000.0, "Palm Jumeirah", "Shoreline Apartments"),
        transaction("1-102-2023-8870", "100488", "2023-11-02", "Sales", 7_900_000.0, "Palm Jumeirah", "Oceana Residences"),
        transaction("1-102-2023-5531", "204117", "2023-08-21", "Mortgages", 1_650_000.0, "Dubai Marina", "Marina Gate"),
        transaction("1-102-2022-3307", "100231", "2022-06-09", "Sales", 3_200_000.0, "Palm Jumeirah", "Shoreline Apartments"),
        transaction("1-102-2022-1194", "305902", "2022-02-14", "Gifts", 980_000.0, "Business Bay", "Executive Towers"),
    ]
}
