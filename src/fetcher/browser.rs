//! Headless Chrome implementation of [`PageFetcher`].

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::time::sleep;
use tracing::{error, info, warn};

use super::{classify_page, FetchError, PageFetcher, PageStatus, RetryPolicy, EMPTY_PAGE_HTML};
use crate::config::Config;

/// Desktop browser identities rotated across fetch attempts.
static USER_AGENTS: [&str; 7] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/109.0",
];

/// One headless Chrome session serving every fetch of a run. The child
/// process is torn down when this is dropped.
pub struct BrowserFetcher {
    tab: Arc<Tab>,
    config: Arc<Config>,
    policy: RetryPolicy,
    // Keeps the browser process alive for the lifetime of the tab.
    _browser: Browser,
}

impl BrowserFetcher {
    pub fn launch(config: Arc<Config>) -> Result<Self> {
        info!("Launching headless Chrome session");
        let options = LaunchOptions {
            headless: true,
            window_size: Some((config.window_width, config.window_height)),
            args: vec![OsStr::new("--disable-gpu")],
            ..Default::default()
        };
        let browser = Browser::new(options).context("Failed to launch headless Chrome")?;
        let tab = browser
            .new_tab()
            .context("Failed to open a browser tab")?;

        let policy = RetryPolicy::new(
            config.retry_max_attempts,
            Duration::from_secs(config.retry_backoff_min_secs),
            Duration::from_secs(config.retry_backoff_max_secs),
        );
        Ok(Self {
            tab,
            config,
            policy,
            _browser: browser,
        })
    }

    /// One navigation attempt: rotate the browser identity, load the
    /// page, give client-side rendering time to finish, classify what
    /// came back.
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = pick_user_agent();
        self.tab
            .set_user_agent(user_agent, None, None)
            .map_err(|e| FetchError::Navigation(e.to_string()))?;
        self.tab
            .navigate_to(url)
            .map_err(|e| FetchError::Navigation(e.to_string()))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        let wait = self.render_wait();
        info!("Waiting {:.2}s for page to render", wait.as_secs_f64());
        sleep(wait).await;

        let html = self
            .tab
            .get_content()
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        match classify_page(&html) {
            PageStatus::Blocked => Err(FetchError::Blocked),
            PageStatus::Blank => Err(FetchError::BlankRender),
            PageStatus::NoResults => {
                info!("Site reported no results for {}", url);
                Ok(EMPTY_PAGE_HTML.to_string())
            }
            PageStatus::Listings => Ok(html),
        }
    }

    fn render_wait(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let secs = rng.gen_range(
            self.config.page_load_wait_min_secs..=self.config.page_load_wait_max_secs,
        );
        Duration::from_secs_f64(secs)
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error: Option<FetchError> = None;
        for attempt in 1..=self.policy.max_attempts {
            match self.fetch_once(url).await {
                Ok(html) => {
                    info!("Fetched {} on attempt {}", url, attempt);
                    return Ok(html);
                }
                Err(e) if self.policy.should_retry(&e, attempt) => {
                    let backoff = self.policy.backoff(attempt);
                    warn!(
                        "Attempt {}/{} for {} failed: {}. Retrying in {}s",
                        attempt,
                        self.policy.max_attempts,
                        url,
                        e,
                        backoff.as_secs()
                    );
                    sleep(backoff).await;
                    last_error = Some(e);
                }
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => last_error = Some(e),
            }
        }

        error!(
            "Failed to fetch {} after {} attempts",
            url, self.policy.max_attempts
        );
        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.policy.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts were made".to_string()),
        })
    }
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
