// realco-core/src/domain/rows/mod.rs

// Adapters from raw warehouse rows to fixed-shape records. Each adapter declares an
// alias table (domain field -> acceptable source columns, in priority order) and
// resolves every field through `lookup`. Adding an alias is a data change only.

pub mod buildings;
pub mod contacts;
pub mod owners;
pub mod transactions;

pub use buildings::BuildingRow;
pub use contacts::MondayContactRow;
pub use owners::OwnerRow;
pub use transactions::TransactionRow;

use serde_json::Value;

use crate::ports::warehouse::SqlRow;

/// Domain field name paired with its candidate source columns.
pub type FieldAliases = (&'static str, &'static [&'static str]);

/// First value found under one of `aliases`.
///
/// Each alias is tried as an exact key, then case-insensitively, before moving on to
/// the next alias. A key that is present wins even when its value is null.
pub fn lookup<'a>(row: &'a SqlRow, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            return Some(value);
        }
        if let Some((_, value)) = row.iter().find(|(key, _)| key.eq_ignore_ascii_case(alias)) {
            return Some(value);
        }
    }
    None
}

/// Trimmed text, with blank and null collapsing to `None`.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => non_blank(&other.to_string()),
    }
}

/// Numeric value from a JSON number or a numeric string (thousands separators allowed).
pub fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn row(pairs: &[(&str, Value)]) -> SqlRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Upper-cases every other character so aliases are exercised in mixed casing.
    pub fn scramble_case(alias: &str) -> String {
        alias
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i % 2 == 0 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    /// Adapts a row holding `" 42 "` under each alias (in scrambled casing) and checks
    /// the field comes back as text `"42"` or number `42`.
    pub fn assert_every_alias_resolves<T: serde::Serialize>(
        fields: &[FieldAliases],
        adapt: impl Fn(&SqlRow) -> T,
    ) {
        for (field, aliases) in fields {
            for alias in *aliases {
                let raw = row(&[(scramble_case(alias).as_str(), Value::from(" 42 "))]);
                let adapted = match serde_json::to_value(adapt(&raw)) {
                    Ok(value) => value,
                    Err(e) => panic!("adapted row must serialize: {e}"),
                };
                let got = &adapted[*field];
                assert!(
                    *got == Value::from("42") || got.as_f64() == Some(42.0),
                    "field {field} via alias {alias} gave {got}"
                );
            }
        }
    }

    pub fn assert_all_null<T: serde::Serialize>(adapted: T) {
        let value = match serde_json::to_value(adapted) {
            Ok(value) => value,
            Err(e) => panic!("adapted row must serialize: {e}"),
        };
        let object = value.as_object().cloned().unwrap_or_default();
        assert!(!object.is_empty());
        for (field, v) in object {
            assert!(v.is_null(), "{field} should be null, got {v}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::row;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_key_beats_case_insensitive_key() {
        let raw = row(&[("NAME", json!("upper")), ("name", json!("exact"))]);
        assert_eq!(lookup(&raw, &["name"]), Some(&json!("exact")));
    }

    #[test]
    fn test_earlier_alias_wins_even_when_later_alias_is_exact() {
        let raw = row(&[("FULL_NAME", json!("Alias One")), ("name", json!("Alias Two"))]);
        assert_eq!(
            lookup(&raw, &["full_name", "name"]),
            Some(&json!("Alias One"))
        );
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(text(Some(&json!("  a  "))), Some("a".to_string()));
        assert_eq!(text(Some(&json!("   "))), None);
        assert_eq!(text(Some(&json!(null))), None);
        assert_eq!(text(None), None);
        assert_eq!(text(Some(&json!(123))), Some("123".to_string()));
        assert_eq!(text(Some(&json!(true))), Some("true".to_string()));
    }

    #[test]
    fn test_number_normalization() {
        assert_eq!(number(Some(&json!(1500000))), Some(1_500_000.0));
        assert_eq!(number(Some(&json!(" 2,350,000.50 "))), Some(2_350_000.5));
        assert_eq!(number(Some(&json!("n/a"))), None);
        assert_eq!(number(Some(&json!(""))), None);
        assert_eq!(number(Some(&json!(null))), None);
    }
}
