// realco-core/src/domain/rows/owners.rs

use serde::Serialize;

use super::{FieldAliases, lookup, text};
use crate::ports::warehouse::SqlRow;

const OWNER_ID: &[&str] = &["owner_id", "master_contact_id", "contact_id", "customer_id"];
const OWNER_NAME: &[&str] = &["owner_name", "full_name", "name", "contact_name"];
const EMAIL: &[&str] = &["email", "email_address"];
const PHONE: &[&str] = &["phone", "mobile", "phone_number"];
const SOURCE_LABEL: &[&str] = &["source_label", "source", "source_system"];

pub const FIELDS: &[FieldAliases] = &[
    ("owner_id", OWNER_ID),
    ("owner_name", OWNER_NAME),
    ("email", EMAIL),
    ("phone", PHONE),
    ("source_label", SOURCE_LABEL),
];

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct OwnerRow {
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source_label: Option<String>,
}

impl OwnerRow {
    pub fn adapt(row: &SqlRow) -> Self {
        Self {
            owner_id: text(lookup(row, OWNER_ID)),
            owner_name: text(lookup(row, OWNER_NAME)),
            email: text(lookup(row, EMAIL)),
            phone: text(lookup(row, PHONE)),
            source_label: text(lookup(row, SOURCE_LABEL)),
        }
    }

    /// Owners without an id or a name carry nothing worth listing.
    pub fn is_identifiable(&self) -> bool {
        self.owner_id.is_some() || self.owner_name.is_some()
    }
}
