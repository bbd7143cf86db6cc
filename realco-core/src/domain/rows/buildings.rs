// realco-core/src/domain/rows/buildings.rs

use serde::Serialize;

use super::{FieldAliases, lookup, text};
use crate::ports::warehouse::SqlRow;

const PROPERTY_ID: &[&str] = &["property_id", "unit_id", "property_number"];
const AREA_NAME_EN: &[&str] = &["area_name_en", "area_name", "area"];
const PROJECT_NAME_EN: &[&str] = &["project_name_en", "project_name", "project"];
const BUILDING_NUMBER: &[&str] = &["building_number", "building_no", "bldg_number"];
const FLOORS: &[&str] = &["floors", "floor_count", "no_of_floors"];
const ROOMS_EN: &[&str] = &["rooms_en", "rooms", "bedrooms"];
const IS_REGISTERED: &[&str] = &["is_registered", "registration_status", "reg_status"];
const LAND_TYPE_EN: &[&str] = &["land_type_en", "land_type"];

pub const FIELDS: &[FieldAliases] = &[
    ("property_id", PROPERTY_ID),
    ("area_name_en", AREA_NAME_EN),
    ("project_name_en", PROJECT_NAME_EN),
    ("building_number", BUILDING_NUMBER),
    ("floors", FLOORS),
    ("rooms_en", ROOMS_EN),
    ("is_registered", IS_REGISTERED),
    ("land_type_en", LAND_TYPE_EN),
];

/// A freehold unit as listed in the land department buildings view.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct BuildingRow {
    pub property_id: Option<String>,
    pub area_name_en: Option<String>,
    pub project_name_en: Option<String>,
    pub building_number: Option<String>,
    pub floors: Option<String>,
    pub rooms_en: Option<String>,
    pub is_registered: Option<String>,
    pub land_type_en: Option<String>,
}

impl BuildingRow {
    pub fn adapt(row: &SqlRow) -> Self {
        Self {
            property_id: text(lookup(row, PROPERTY_ID)),
            area_name_en: text(lookup(row, AREA_NAME_EN)),
            project_name_en: text(lookup(row, PROJECT_NAME_EN)),
            building_number: text(lookup(row, BUILDING_NUMBER)),
            floors: text(lookup(row, FLOORS)),
            rooms_en: text(lookup(row, ROOMS_EN)),
            is_registered: text(lookup(row, IS_REGISTERED)),
            land_type_en: text(lookup(row, LAND_TYPE_EN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rows::test_support::{assert_all_null, assert_every_alias_resolves, row};
    use serde_json::json;

    #[test]
    fn test_adapt_trims_and_nulls_blank_values() {
        let raw = row(&[("Property_ID", json!(" 123 ")), ("AREA_NAME_EN", json!(""))]);
        let building = BuildingRow::adapt(&raw);

        assert_eq!(building.property_id.as_deref(), Some("123"));
        assert_eq!(building.area_name_en, None);
        assert_eq!(building.project_name_en, None);
    }

    #[test]
    fn test_numeric_columns_become_text() {
        let raw = row(&[("property_id", json!(98765)), ("floors", json!(42))]);
        let building = BuildingRow::adapt(&raw);

        assert_eq!(building.property_id.as_deref(), Some("98765"));
        assert_eq!(building.floors.as_deref(), Some("42"));
    }

    #[test]
    fn test_every_alias_resolves() {
        assert_every_alias_resolves(FIELDS, BuildingRow::adapt);
    }

    #[test]
    fn test_empty_row_is_all_null() {
        assert_all_null(BuildingRow::adapt(&SqlRow::new()));
        assert_all_null(BuildingRow::adapt(&row(&[("unrelated", json!("x"))])));
    }
}
