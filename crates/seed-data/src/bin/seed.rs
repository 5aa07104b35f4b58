//! Seed script - pushes product records into the hosted products table
//!
//! Run with:
//! ```sh
//! SEED_ENDPOINT=https://<project>.supabase.co SEED_API_KEY=<service key> \
//!     cargo run -p seed-data --bin seed
//! ```
//!
//! Per-record results and the summary go to stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use seed_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Insert product records into the hosted products table")]
struct Cli {
    /// JSON config file with `endpoint`, `apiKey` and `collectionPath`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of product records (defaults to the built-in samples).
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// Skip records whose name already exists in the collection.
    #[arg(long)]
    skip_existing: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SeedConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!("Using {config:?}");

    let records = match &cli.records {
        Some(path) => load_records(path)?,
        None => sample_products(),
    };

    let client = RestClient::new(&config)?;
    tracing::info!("Target collection: {}", client.collection_url());

    let report = Seeder::new(client, records)
        .skip_existing(cli.skip_existing)
        .with_progress(|event| println!("{event}"))
        .run()
        .await;

    println!("\n{report}");

    Ok(())
}
