//! Catalog loader for the ingredient and tag reference data.
//!
//! Usage:
//! ```bash
//! # Ingredients from CSV (`name,measurement_unit`, no header) or JSON
//! foodgram-import ingredients data/ingredients.csv
//!
//! # Tags from JSON (`[{"name", "slug", "color"}]`)
//! foodgram-import tags data/tags.json
//! ```
//!
//! Re-running an import is safe: existing ingredients are skipped and tags
//! are updated in place by slug.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodgram_api::import::{import_ingredients, import_tags};

#[derive(Parser)]
#[command(name = "foodgram-import", about = "Load Foodgram catalog data")]
struct ImportArgs {
    /// Database URL override (defaults to `DATABASE_URL`)
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Catalog,
}

#[derive(Subcommand)]
enum Catalog {
    /// Import ingredients from a CSV or JSON file
    Ingredients { path: PathBuf },
    /// Import tags from a JSON file
    Tags { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram_api=info,foodgram_import=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ImportArgs::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
    };

    let pool = foodgram_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    foodgram_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let report = match args.command {
        Catalog::Ingredients { path } => import_ingredients(&pool, &path).await?,
        Catalog::Tags { path } => import_tags(&pool, &path).await?,
    };
    println!("Read {} entries, wrote {}", report.parsed, report.written);
    Ok(())
}
