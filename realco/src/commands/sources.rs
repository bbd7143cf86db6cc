// realco/src/commands/sources.rs
//
// USE CASE: Show how each logical dataset was resolved.

use serde_json::json;

use realco_core::application::Dashboard;

use super::print_json;

pub fn execute(dashboard: &Dashboard) -> anyhow::Result<()> {
    let config = dashboard.client().config();
    let sources = dashboard.sources();

    print_json(&json!({
        "mode": config.mode,
        "catalog": config.catalog,
        "preferred_schema": config.preferred_schema,
        "sources": sources,
        "missing": sources.missing(),
    }))
}
