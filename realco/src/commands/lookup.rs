// realco/src/commands/lookup.rs
//
// USE CASES: Dashboard queries, printed as adapted JSON rows.

use realco_core::application::Dashboard;

use super::print_json;

pub async fn units(dashboard: &Dashboard, query: &str, limit: usize) -> anyhow::Result<()> {
    print_json(&dashboard.queries().unit_candidates(query, limit).await?)
}

pub async fn transactions(
    dashboard: &Dashboard,
    property_id: &str,
    limit: usize,
) -> anyhow::Result<()> {
    print_json(
        &dashboard
            .queries()
            .transactions_for_unit(property_id, limit)
            .await?,
    )
}

pub async fn trends(
    dashboard: &Dashboard,
    area: &str,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    print_json(&dashboard.queries().area_trends(area, from, to, limit).await?)
}

pub async fn owners(dashboard: &Dashboard, limit: usize) -> anyhow::Result<()> {
    print_json(&dashboard.queries().owners(limit).await?)
}

pub async fn contacts(dashboard: &Dashboard, limit: usize) -> anyhow::Result<()> {
    print_json(&dashboard.queries().monday_contacts(limit).await?)
}
