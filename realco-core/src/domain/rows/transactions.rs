// realco-core/src/domain/rows/transactions.rs

use serde::Serialize;

use super::{FieldAliases, lookup, number, text};
use crate::ports::warehouse::SqlRow;

const TRANSACTION_ID: &[&str] = &["transaction_id", "transaction_number", "trans_id"];
const PROPERTY_ID: &[&str] = &["property_id", "unit_id", "property_number"];
const INSTANCE_DATE: &[&str] = &["instance_date", "transaction_date", "trans_date"];
const TRANS_GROUP_EN: &[&str] = &["trans_group_en", "trans_group", "transaction_group"];
const PROCEDURE_NAME_EN: &[&str] = &["procedure_name_en", "procedure_name"];
const ACTUAL_WORTH: &[&str] = &["actual_worth", "amount", "transaction_value"];
const METER_SALE_PRICE: &[&str] = &["meter_sale_price", "price_per_sqm"];
const PROCEDURE_AREA: &[&str] = &["procedure_area", "area_sqm", "size_sqm"];
const AREA_NAME_EN: &[&str] = &["area_name_en", "area_name", "area"];
const PROJECT_NAME_EN: &[&str] = &["project_name_en", "project_name", "project"];
const BUILDING_NAME_EN: &[&str] = &["building_name_en", "building_name"];
const ROOMS_EN: &[&str] = &["rooms_en", "rooms", "bedrooms"];

pub const FIELDS: &[FieldAliases] = &[
    ("transaction_id", TRANSACTION_ID),
    ("property_id", PROPERTY_ID),
    ("instance_date", INSTANCE_DATE),
    ("trans_group_en", TRANS_GROUP_EN),
    ("procedure_name_en", PROCEDURE_NAME_EN),
    ("actual_worth", ACTUAL_WORTH),
    ("meter_sale_price", METER_SALE_PRICE),
    ("procedure_area", PROCEDURE_AREA),
    ("area_name_en", AREA_NAME_EN),
    ("project_name_en", PROJECT_NAME_EN),
    ("building_name_en", BUILDING_NAME_EN),
    ("rooms_en", ROOMS_EN),
];

/// One registered sale, mortgage or gift from the transactions export.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct TransactionRow {
    pub transaction_id: Option<String>,
    pub property_id: Option<String>,
    pub instance_date: Option<String>,
    pub trans_group_en: Option<String>,
    pub procedure_name_en: Option<String>,
    pub actual_worth: Option<f64>,
    pub meter_sale_price: Option<f64>,
    pub procedure_area: Option<f64>,
    pub area_name_en: Option<String>,
    pub project_name_en: Option<String>,
    pub building_name_en: Option<String>,
    pub rooms_en: Option<String>,
}

impl TransactionRow {
    pub fn adapt(row: &SqlRow) -> Self {
        Self {
            transaction_id: text(lookup(row, TRANSACTION_ID)),
            property_id: text(lookup(row, PROPERTY_ID)),
            instance_date: text(lookup(row, INSTANCE_DATE)),
            trans_group_en: text(lookup(row, TRANS_GROUP_EN)),
            procedure_name_en: text(lookup(row, PROCEDURE_NAME_EN)),
            actual_worth: number(lookup(row, ACTUAL_WORTH)),
            meter_sale_price: number(lookup(row, METER_SALE_PRICE)),
            procedure_area: number(lookup(row, PROCEDURE_AREA)),
            area_name_en: text(lookup(row, AREA_NAME_EN)),
            project_name_en: text(lookup(row, PROJECT_NAME_EN)),
            building_name_en: text(lookup(row, BUILDING_NAME_EN)),
            rooms_en: text(lookup(row, ROOMS_EN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rows::test_support::{assert_all_null, assert_every_alias_resolves, row};
    use serde_json::json;

    #[test]
    fn test_adapt_parses_amounts() {
        let raw = row(&[
            ("TRANSACTION_ID", json!("1-11-2023-123")),
            ("Instance_Date", json!("2023-05-14")),
            ("actual_worth", json!("2,100,000")),
            ("meter_sale_price", json!(18250.75)),
            ("procedure_area", json!("not measured")),
        ]);
        let tx = TransactionRow::adapt(&raw);

        assert_eq!(tx.transaction_id.as_deref(), Some("1-11-2023-123"));
        assert_eq!(tx.instance_date.as_deref(), Some("2023-05-14"));
        assert_eq!(tx.actual_worth, Some(2_100_000.0));
        assert_eq!(tx.meter_sale_price, Some(18250.75));
        assert_eq!(tx.procedure_area, None);
    }

    #[test]
    fn test_every_alias_resolves() {
        assert_every_alias_resolves(FIELDS, TransactionRow::adapt);
    }

    #[test]
    fn test_blank_row_is_all_null() {
        let raw = row(&[
            ("transaction_id", json!("  ")),
            ("actual_worth", json!(null)),
            ("area_name_en", json!("")),
        ]);
        assert_all_null(TransactionRow::adapt(&raw));
    }
}
