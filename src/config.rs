use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Scraper settings. Timing, retry and browser parameters are fixed
/// here; the keyword, page budget and output directory come from the
/// command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Window, in seconds, to let a page finish client-side rendering.
    pub page_load_wait_min_secs: f64,
    pub page_load_wait_max_secs: f64,
    /// Politeness delay between consecutive page fetches, in seconds.
    pub inter_page_delay_min_secs: f64,
    pub inter_page_delay_max_secs: f64,
    pub retry_max_attempts: u32,
    pub retry_backoff_min_secs: u64,
    pub retry_backoff_max_secs: u64,
    pub window_width: u32,
    pub window_height: u32,
    /// Prefix of the output file names.
    pub output_base_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // For now, hardcode the configuration matching the deployment.
        Ok(Config {
            base_url: "https://www.fiverr.com".to_string(),
            page_load_wait_min_secs: 8.0,
            page_load_wait_max_secs: 12.0,
            inter_page_delay_min_secs: 5.0,
            inter_page_delay_max_secs: 10.0,
            retry_max_attempts: 3,
            retry_backoff_min_secs: 2,
            retry_backoff_max_secs: 6,
            window_width: 1920,
            window_height: 1080,
            output_base_name: "fiverr_gigs".to_string(),
        })
    }
}
