// realco/src/commands/schemas.rs
//
// USE CASE: Explore the catalog for tables worth configuring.

use realco_core::application::{Dashboard, find_candidate_schemas, list_tables};

pub async fn execute(dashboard: &Dashboard, with_tables: bool) -> anyhow::Result<()> {
    let client = dashboard.client();
    let config = client.config();
    if !client.is_live() {
        eprintln!("⚠️  Mock mode: catalog listings are empty without live credentials.");
    }

    let schemas =
        find_candidate_schemas(client, &config.catalog, config.preferred_schema.as_deref()).await?;
    println!("📂 {} candidate schema(s) in '{}'", schemas.len(), config.catalog);

    for schema in schemas {
        println!("   ➜ {}.{}", config.catalog, schema);
        if with_tables {
            for table in list_tables(client, &config.catalog, &schema).await? {
                println!("      • {}", table);
            }
        }
    }
    Ok(())
}
