// realco-core/src/domain/rows/contacts.rs

use serde::Serialize;

use super::{FieldAliases, lookup, text};
use crate::ports::warehouse::SqlRow;

const MASTER_CONTACT_ID: &[&str] = &["master_contact_id", "contact_id", "id"];
const FULL_NAME: &[&str] = &["full_name", "contact_name", "name"];
const EMAIL: &[&str] = &["email", "primary_email", "email_address"];
const PHONE: &[&str] = &["phone", "primary_phone", "mobile", "phone_number"];
const SOURCE_BOARD: &[&str] = &["source_board", "board_name", "board"];
const FIRST_SEEN_AT: &[&str] = &["first_seen_at", "created_at"];
const LAST_SEEN_AT: &[&str] = &["last_seen_at", "updated_at"];

pub const FIELDS: &[FieldAliases] = &[
    ("master_contact_id", MASTER_CONTACT_ID),
    ("full_name", FULL_NAME),
    ("email", EMAIL),
    ("phone", PHONE),
    ("source_board", SOURCE_BOARD),
    ("first_seen_at", FIRST_SEEN_AT),
    ("last_seen_at", LAST_SEEN_AT),
];

/// A deduplicated CRM contact profile.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MondayContactRow {
    pub master_contact_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source_board: Option<String>,
    pub first_seen_at: Option<String>,
    pub last_seen_at: Option<String>,
}

impl MondayContactRow {
    pub fn adapt(row: &SqlRow) -> Self {
        Self {
            master_contact_id: text(lookup(row, MASTER_CONTACT_ID)),
            full_name: text(lookup(row, FULL_NAME)),
            email: text(lookup(row, EMAIL)),
            phone: text(lookup(row, PHONE)),
            source_board: text(lookup(row, SOURCE_BOARD)),
            first_seen_at: text(lookup(row, FIRST_SEEN_AT)),
            last_seen_at: text(lookup(row, LAST_SEEN_AT)),
        }
    }
}
