//! CSV and JSON writers for scraped listings.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::models::{GigListing, COLUMNS};

/// Create the output directory when it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        info!("Output directory {} does not exist, creating it", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

/// Write the listings as both CSV and JSON, named
/// `{base}_{keyword_slug}_{timestamp}.{csv,json}`. Both files share one
/// timestamp. Returns the two paths written.
pub fn write_outputs(
    listings: &[GigListing],
    dir: &Path,
    base_name: &str,
    keyword: &str,
) -> Result<(PathBuf, PathBuf)> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let csv_path = output_path(dir, base_name, keyword, &timestamp, "csv");
    let json_path = output_path(dir, base_name, keyword, &timestamp, "json");
    write_csv(listings, &csv_path)?;
    write_json(listings, &json_path)?;
    Ok((csv_path, json_path))
}

pub fn write_csv(listings: &[GigListing], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    writer
        .write_record(COLUMNS)
        .context("Failed to write CSV header")?;
    for listing in listings {
        writer
            .write_record(listing.csv_fields())
            .with_context(|| format!("Failed to write CSV row for {}", listing.gig_url))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    info!("Saved {} gigs to {}", listings.len(), path.display());
    Ok(())
}

pub fn write_json(listings: &[GigListing], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file {}", path.display()))?;
    serde_json::to_writer_pretty(file, listings)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    info!("Saved {} gigs to {}", listings.len(), path.display());
    Ok(())
}

fn output_path(
    dir: &Path,
    base_name: &str,
    keyword: &str,
    timestamp: &str,
    extension: &str,
) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.{}",
        base_name,
        keyword_slug(keyword),
        timestamp,
        extension
    ))
}

/// Lowercased keyword with spaces replaced by underscores, used in
/// output file names.
fn keyword_slug(keyword: &str) -> String {
    keyword.to_lowercase().replace(' ', "_")
}
