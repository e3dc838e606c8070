//! End-to-end execution of a query list against one browsing session.

use std::time::Duration;

use mapgrab_core::{Query, RateLimitPolicy};

use crate::page::{FeedProbe, InputHandle, PageHandle};
use crate::scroll::auto_scroll;
use crate::timing;
use crate::ScraperError;

/// Candidate selectors for the search input, tried in priority order.
pub const SEARCH_INPUT_SELECTORS: [&str; 3] = [
    "input[id*=\"searchboxinput\"]",
    "input[aria-label*=\"Search\"]",
    "input[name=\"q\"]",
];

// Pauses around the typing burst, in seconds.
const CLEAR_PAUSE_SECS: (f64, f64) = (0.3, 0.7);
const SUBMIT_PAUSE_SECS: (f64, f64) = (0.5, 1.5);

const DEFAULT_INPUT_WAIT: Duration = Duration::from_secs(5);
const DEFAULT_RESULTS_SETTLE: Duration = Duration::from_secs(3);

/// Tally of a multi-query run. Failed queries are skipped, not retried.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives searches against one page, pacing every interaction through the
/// timing model. Owns the page and its feed probe for the whole run; queries
/// are strictly sequential by design — overlapping sessions would defeat the
/// humanization goal.
pub struct SearchSession<P: PageHandle, F: FeedProbe> {
    page: P,
    feed: F,
    policy: RateLimitPolicy,
    input_wait: Duration,
    results_settle: Duration,
}

impl<P: PageHandle, F: FeedProbe> SearchSession<P, F> {
    pub fn new(page: P, feed: F, policy: RateLimitPolicy) -> Self {
        Self {
            page,
            feed,
            policy,
            input_wait: DEFAULT_INPUT_WAIT,
            results_settle: DEFAULT_RESULTS_SETTLE,
        }
    }

    /// Per-selector visibility wait when locating the search input.
    #[must_use]
    pub fn with_input_wait(mut self, wait: Duration) -> Self {
        self.input_wait = wait;
        self
    }

    /// Pause between submitting a search and starting to scroll.
    #[must_use]
    pub fn with_results_settle(mut self, settle: Duration) -> Self {
        self.results_settle = settle;
        self
    }

    /// Navigates the session's page.
    ///
    /// # Errors
    ///
    /// Propagates the navigation failure; unlike per-query errors this is
    /// left to the caller, who typically treats it as fatal at startup.
    pub async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.page.navigate(url).await
    }

    /// Runs every query in order, sleeping the policy's search delay between
    /// consecutive queries. Individual failures never abort the run.
    pub async fn run(&mut self, queries: &[Query]) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = queries.len();

        for (i, query) in queries.iter().enumerate() {
            tracing::info!(
                index = i + 1,
                total,
                query = %query.rendered_text,
                "starting search"
            );
            summary.attempted += 1;
            if self.search(&query.rendered_text, true).await {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            if i + 1 < total {
                let delay = timing::sample_uniform(
                    self.policy.min_search_delay_secs,
                    self.policy.max_search_delay_secs,
                );
                tracing::debug!(delay_secs = delay, "pausing before next search");
                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            }
        }

        summary
    }

    /// Executes one search. Returns whether it succeeded; failures are
    /// logged and reported, never propagated, so the caller can continue
    /// with the rest of the run.
    pub async fn search(&mut self, text: &str, wait_for_results: bool) -> bool {
        match self.try_search(text).await {
            Ok(()) => {
                if wait_for_results {
                    tokio::time::sleep(self.results_settle).await;
                    auto_scroll(&mut self.feed, &self.policy).await;
                }
                true
            }
            Err(err) => {
                tracing::warn!(query = text, error = %err, "search failed");
                false
            }
        }
    }

    async fn try_search(&mut self, text: &str) -> Result<(), ScraperError> {
        let mut input = self
            .page
            .find_visible(&SEARCH_INPUT_SELECTORS, self.input_wait)
            .await?
            .ok_or(ScraperError::InputNotFound {
                selectors: SEARCH_INPUT_SELECTORS.len(),
            })?;

        input.clear().await?;
        pause_within(CLEAR_PAUSE_SECS).await;

        let delays = timing::keystroke_delays(text);
        for (c, delay_ms) in text.chars().zip(delays) {
            input
                .type_char(c, Duration::from_secs_f64(delay_ms / 1000.0))
                .await?;
        }

        pause_within(SUBMIT_PAUSE_SECS).await;
        input.submit().await
    }
}

async fn pause_within((min, max): (f64, f64)) {
    let secs = timing::sample_uniform(min, max);
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}
