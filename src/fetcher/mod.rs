//! Page fetching: a trait seam over the headless browser session so the
//! pagination logic can run against scripted pages in tests.

pub mod browser;
pub mod retry;

use async_trait::async_trait;
use thiserror::Error;

pub use browser::BrowserFetcher;
pub use retry::RetryPolicy;

/// Text Fiverr renders on its bot-detection interstitial.
pub const BLOCKED_MARKER: &str = "Hmm, something seems to have gone wrong";

/// Text rendered when a search legitimately has no results.
pub const NO_RESULTS_MARKER: &str = "No services found for your search";

/// Minimal document returned for a valid-but-empty results page, so the
/// extractor sees well-formed HTML with no cards.
pub const EMPTY_PAGE_HTML: &str = "<html><body></body></html>";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("page blocked by bot detection")]
    Blocked,
    #[error("page rendered blank")]
    BlankRender,
    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

impl FetchError {
    /// Whether another attempt at the same URL could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Navigation(_) | FetchError::Blocked | FetchError::BlankRender
        )
    }
}

/// What a rendered document turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Looks like a normal results page.
    Listings,
    /// The site reported no results for the query.
    NoResults,
    /// The bot wall was served instead of results.
    Blocked,
    /// Nothing came back from the render.
    Blank,
}

/// Classify a rendered document by its wall/no-results markers.
pub fn classify_page(html: &str) -> PageStatus {
    if html.trim().is_empty() {
        return PageStatus::Blank;
    }
    if html.contains(BLOCKED_MARKER) {
        return PageStatus::Blocked;
    }
    if html.contains(NO_RESULTS_MARKER) {
        return PageStatus::NoResults;
    }
    PageStatus::Listings
}

/// Fetches one rendered search page. The production implementation
/// drives headless Chrome; tests substitute scripted fetchers.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}
