// realco/src/commands/query.rs
//
// USE CASE: Execute a read-only SQL statement (ad-hoc).

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::Value;

use realco_core::application::Dashboard;
use realco_core::ports::SqlRow;

/// Prints the rows as a table; returns false (after printing a diagnostic) on failure.
pub async fn execute(dashboard: &Dashboard, sql: &str) -> bool {
    let start = std::time::Instant::now();

    match dashboard.client().execute_read_only(sql).await {
        Ok(rows) => {
            println!("{}", render(&rows));
            println!("✅ {} row(s) in {:.2?}", rows.len(), start.elapsed());
            true
        }
        Err(e) => {
            eprintln!("❌ Query failed:\n{:?}", miette::Report::new(e));
            false
        }
    }
}

fn render(rows: &[SqlRow]) -> Table {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.clone());

    for row in rows {
        table.add_row(headers.iter().map(|h| cell(row.get(*h))));
    }
    table
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
