// realco/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use realco_core::application::ArtifactPolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug realco verify ... pour voir les détails.
    // stderr only: stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = match &cli.command {
        Commands::Sources { strict: true } => ArtifactPolicy::Strict,
        _ => ArtifactPolicy::BestEffort,
    };
    let dashboard = commands::bootstrap(&cli.artifact, policy).await?;

    match cli.command {
        // --- USE CASE: HEALTH CHECK ---
        Commands::Verify => {
            if !commands::verify::execute(&dashboard).await? {
                // Exit with error code for CI/CD
                std::process::exit(1);
            }
        }

        // --- USE CASE: AD-HOC QUERY ---
        Commands::Query { sql } => {
            if !commands::query::execute(&dashboard, &sql).await {
                std::process::exit(1);
            }
        }

        Commands::Sources { .. } => commands::sources::execute(&dashboard)?,

        Commands::Schemas { tables } => commands::schemas::execute(&dashboard, tables).await?,

        // --- USE CASES: DASHBOARD QUERIES ---
        Commands::Units { query, limit } => {
            commands::lookup::units(&dashboard, &query, limit).await?
        }
        Commands::Transactions { property_id, limit } => {
            commands::lookup::transactions(&dashboard, &property_id, limit).await?
        }
        Commands::Trends {
            area,
            from,
            to,
            limit,
        } => {
            commands::lookup::trends(&dashboard, &area, from.as_deref(), to.as_deref(), limit)
                .await?
        }
        Commands::Owners { limit } => commands::lookup::owners(&dashboard, limit).await?,
        Commands::Contacts { limit } => commands::lookup::contacts(&dashboard, limit).await?,

        Commands::Smoke => {
            if !commands::smoke::execute(&dashboard).await {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
