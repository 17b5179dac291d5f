//! Walks the search pages for one keyword and accumulates listings
//! until the page budget, an empty page, or a failed fetch stops it.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::Config;
use crate::extractor;
use crate::fetcher::PageFetcher;
use crate::models::{GigListing, RunReport, StopReason};

/// Accumulated records plus the run report for one keyword.
#[derive(Debug)]
pub struct RunOutcome {
    pub listings: Vec<GigListing>,
    pub report: RunReport,
}

pub struct Paginator<'a> {
    fetcher: &'a dyn PageFetcher,
    config: Arc<Config>,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Walk result pages 1..=max_pages for the keyword. Stops early on
    /// the first page with no listings or the first fetch that fails
    /// past retries; records collected so far are always kept.
    pub async fn run(&self, keyword: &str, max_pages: u32) -> RunOutcome {
        let mut listings = Vec::new();
        let mut fragments_dropped = 0;
        let mut pages_attempted = 0;
        let mut stop_reason = StopReason::BudgetReached;

        for page in 1..=max_pages {
            pages_attempted = page;
            let url = search_url(&self.config.base_url, keyword, page);
            info!(
                "Processing page {}/{} for keyword '{}'",
                page, max_pages, keyword
            );

            let html = match self.fetcher.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    error!("Failed to fetch page {} for '{}': {}", page, keyword, e);
                    stop_reason = StopReason::PageFetchFailed { page };
                    break;
                }
            };

            let extraction = extractor::extract_listings(&html, &self.config.base_url);
            fragments_dropped += extraction.fragments_dropped;
            if extraction.listings.is_empty() {
                info!("No listings on page {}; assuming end of results", page);
                stop_reason = StopReason::NoMoreResults { page };
                break;
            }

            info!(
                "Extracted {} listings from page {}",
                extraction.listings.len(),
                page
            );
            listings.extend(extraction.listings);

            if page < max_pages {
                let delay = self.inter_page_delay();
                info!(
                    "Waiting {:.2}s before fetching the next page",
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }
        }

        let report = RunReport {
            keyword: keyword.to_string(),
            pages_attempted,
            records_collected: listings.len(),
            fragments_dropped,
            stop_reason,
        };
        RunOutcome { listings, report }
    }

    fn inter_page_delay(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let secs = rng.gen_range(
            self.config.inter_page_delay_min_secs..=self.config.inter_page_delay_max_secs,
        );
        Duration::from_secs_f64(secs)
    }
}

/// Build the search URL for a keyword and 1-based page index. The page
/// parameter is omitted on the first page; the keyword is form-encoded.
pub fn search_url(base_url: &str, keyword: &str, page: u32) -> String {
    let page_param = page.to_string();
    let pairs: Vec<(&str, &str)> = if page <= 1 {
        vec![("query", keyword)]
    } else {
        vec![("query", keyword), ("page", page_param.as_str())]
    };
    let query = serde_urlencoded::to_string(pairs)
        .unwrap_or_else(|_| format!("query={}", keyword));
    format!("{}/search/gigs?{}", base_url, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, EMPTY_PAGE_HTML};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedFetcher {
        pages: Mutex<VecDeque<Result<String, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<String, FetchError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(EMPTY_PAGE_HTML.to_string()))
        }
    }

    fn failure() -> FetchError {
        FetchError::RetriesExhausted {
            url: "https://www.fiverr.com/search/gigs?query=logo+design&page=2".to_string(),
            attempts: 3,
            last_error: "page blocked by bot detection".to_string(),
        }
    }

    fn page_with_gigs(page: u32, count: usize) -> String {
        let mut html = String::from("<html><body>");
        for i in 0..count {
            html.push_str(&format!(
                r#"<div data-testid="gig-card-layout"><a data-testid="gig-title" href="/seller{page}_{i}/gig">Gig {page}-{i}</a></div>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn test_config() -> Arc<Config> {
        let mut config = Config::load().expect("default config");
        config.inter_page_delay_min_secs = 0.0;
        config.inter_page_delay_max_secs = 0.0;
        Arc::new(config)
    }

    #[tokio::test]
    async fn collects_pages_in_order() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_with_gigs(1, 24)),
            Ok(page_with_gigs(2, 24)),
        ]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 2).await;

        assert_eq!(outcome.listings.len(), 48);
        assert!(outcome.listings[0].gig_url.contains("seller1_0"));
        assert!(outcome.listings[23].gig_url.contains("seller1_23"));
        assert!(outcome.listings[24].gig_url.contains("seller2_0"));
        assert_eq!(fetcher.calls(), 2);

        let report = &outcome.report;
        assert_eq!(report.keyword, "logo design");
        assert_eq!(report.pages_attempted, 2);
        assert_eq!(report.records_collected, 48);
        assert_eq!(report.stop_reason, StopReason::BudgetReached);
    }

    #[tokio::test]
    async fn stops_at_first_empty_page() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(page_with_gigs(1, 24)),
            Ok(EMPTY_PAGE_HTML.to_string()),
            Ok(page_with_gigs(3, 24)),
        ]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 5).await;

        assert_eq!(outcome.listings.len(), 24);
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(outcome.report.pages_attempted, 2);
        assert_eq!(
            outcome.report.stop_reason,
            StopReason::NoMoreResults { page: 2 }
        );
    }

    #[tokio::test]
    async fn empty_first_page_stops_immediately() {
        let fetcher = ScriptedFetcher::new(vec![Ok(EMPTY_PAGE_HTML.to_string())]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("qwzxy", 3).await;

        assert!(outcome.listings.is_empty());
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(
            outcome.report.stop_reason,
            StopReason::NoMoreResults { page: 1 }
        );
    }

    #[tokio::test]
    async fn fetch_failure_keeps_earlier_records() {
        let fetcher = ScriptedFetcher::new(vec![Ok(page_with_gigs(1, 10)), Err(failure())]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 4).await;

        assert_eq!(outcome.listings.len(), 10);
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(outcome.report.pages_attempted, 2);
        assert_eq!(
            outcome.report.stop_reason,
            StopReason::PageFetchFailed { page: 2 }
        );
    }

    #[tokio::test]
    async fn first_page_failure_yields_empty_outcome() {
        let fetcher = ScriptedFetcher::new(vec![Err(failure())]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 2).await;

        assert!(outcome.listings.is_empty());
        assert_eq!(outcome.report.records_collected, 0);
        assert_eq!(outcome.report.pages_attempted, 1);
        assert_eq!(
            outcome.report.stop_reason,
            StopReason::PageFetchFailed { page: 1 }
        );
    }

    #[tokio::test]
    async fn never_fetches_past_the_page_budget() {
        let pages = (1..=10).map(|p| Ok(page_with_gigs(p, 24))).collect();
        let fetcher = ScriptedFetcher::new(pages);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 3).await;

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(outcome.listings.len(), 72);
        assert_eq!(outcome.report.stop_reason, StopReason::BudgetReached);
    }

    #[tokio::test]
    async fn dropped_fragments_are_reported() {
        let html = r#"<html><body>
            <div data-testid="gig-card-layout"><a data-testid="gig-title" href="/a/gig">Good</a></div>
            <div data-testid="gig-card-layout"><span data-testid="price">$5</span></div>
        </body></html>"#;
        let fetcher = ScriptedFetcher::new(vec![Ok(html.to_string())]);
        let paginator = Paginator::new(&fetcher, test_config());

        let outcome = paginator.run("logo design", 1).await;

        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.report.fragments_dropped, 1);
    }

    #[test]
    fn first_page_url_has_no_page_parameter() {
        let url = search_url("https://www.fiverr.com", "logo design", 1);
        assert_eq!(url, "https://www.fiverr.com/search/gigs?query=logo+design");
    }

    #[test]
    fn later_pages_carry_the_page_parameter() {
        let url = search_url("https://www.fiverr.com", "logo design", 2);
        assert_eq!(
            url,
            "https://www.fiverr.com/search/gigs?query=logo+design&page=2"
        );
    }

    #[test]
    fn keyword_is_form_encoded() {
        let url = search_url("https://www.fiverr.com", "café & bar", 1);
        assert_eq!(
            url,
            "https://www.fiverr.com/search/gigs?query=caf%C3%A9+%26+bar"
        );
    }
}
