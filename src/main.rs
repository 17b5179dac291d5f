use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod extractor;
mod fetcher;
mod models;
mod output;
mod pagination;
mod parsers;

use crate::config::Config;
use crate::fetcher::BrowserFetcher;
use crate::pagination::Paginator;

/// Scrape Fiverr search results for a keyword into CSV and JSON files.
#[derive(Parser, Debug)]
#[command(name = "fiverr-scraper", version, about)]
struct Args {
    /// Search keyword, e.g. "logo design"
    keyword: String,

    /// Maximum number of result pages to fetch
    #[arg(long, default_value_t = 2)]
    max_pages: u32,

    /// Directory the CSV and JSON files are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fiverr_scraper=info".parse()?),
        )
        .init();

    let args = Args::parse();
    info!("Starting Fiverr scraper");
    info!(
        "Keyword: '{}', page budget: {}, output directory: {}",
        args.keyword,
        args.max_pages,
        args.output_dir.display()
    );

    let config = Arc::new(Config::load()?);

    output::ensure_output_dir(&args.output_dir)
        .context("Output directory is not usable")?;

    let fetcher = BrowserFetcher::launch(config.clone())
        .context("Could not start the headless browser session")?;

    let paginator = Paginator::new(&fetcher, config.clone());
    let outcome = paginator.run(&args.keyword, args.max_pages).await;

    let report = &outcome.report;
    info!(
        "Run finished for '{}': {} page(s) attempted, {} records collected, {} fragments dropped, stopped because {}",
        report.keyword,
        report.pages_attempted,
        report.records_collected,
        report.fragments_dropped,
        report.stop_reason
    );

    if outcome.listings.is_empty() {
        warn!("No gigs were collected, skipping output files");
        return Ok(());
    }

    let (csv_path, json_path) = output::write_outputs(
        &outcome.listings,
        &args.output_dir,
        &config.output_base_name,
        &args.keyword,
    )?;
    info!(
        "Wrote {} and {}",
        csv_path.display(),
        json_path.display()
    );

    Ok(())
}
