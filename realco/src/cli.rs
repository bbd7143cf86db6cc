// realco/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use realco_core::infrastructure::config::DEFAULT_ARTIFACT_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "realco")]
#[command(about = "Read-only Databricks access for the property dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Discovery artifact recommending source tables
    #[arg(long, global = true, default_value = DEFAULT_ARTIFACT_PATH)]
    pub artifact: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🩺 Checks warehouse connectivity and every configured source (exit 1 when unhealthy)
    Verify,

    /// ⚡ Executes a read-only SQL statement
    Query { sql: String },

    /// 🗺️  Shows the resolved source tables and resolution warnings
    Sources {
        /// Fail when the discovery artifact exists but cannot be parsed
        #[arg(long)]
        strict: bool,
    },

    /// 📂 Lists candidate schemas in the configured catalog
    Schemas {
        /// Also list the tables of each candidate schema
        #[arg(long)]
        tables: bool,
    },

    /// 🏢 Searches buildings by area, project or property id
    Units {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// 🧾 Lists the transactions of one property
    Transactions {
        property_id: String,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// 📈 Lists transactions for an area, optionally between two dates (YYYY-MM-DD)
    Trends {
        area: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 200)]
        limit: usize,
    },

    /// 👤 Lists owners
    Owners {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// 📇 Lists Monday CRM contacts
    Contacts {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// 💨 Runs the query registry smoke sequence
    Smoke,
}
