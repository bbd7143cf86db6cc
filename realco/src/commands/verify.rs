// realco/src/commands/verify.rs
//
// USE CASE: Connectivity report for health checks and CI.

use realco_core::application::Dashboard;

use super::print_json;

/// Prints the report; returns whether everything is healthy.
pub async fn execute(dashboard: &Dashboard) -> anyhow::Result<bool> {
    let report = dashboard.verifier().verify().await;
    print_json(&report)?;

    if !report.ok {
        eprintln!(
            "❌ Databricks connectivity check failed (HTTP {}).",
            report.http_status()
        );
    }
    Ok(report.ok)
}
