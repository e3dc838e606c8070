//! Capability traits over the external browsing session.
//!
//! The controller never talks to a browser API directly; it sees a page
//! through these three small traits. The production implementations live in
//! [`crate::chromium`], tests use in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// A located, interactable input element.
#[async_trait]
pub trait InputHandle: Send {
    /// Activates the element and empties its current value.
    async fn clear(&mut self) -> Result<(), ScraperError>;

    /// Emits one character after waiting `delay`.
    async fn type_char(&mut self, c: char, delay: Duration) -> Result<(), ScraperError>;

    /// Submits the input (Enter).
    async fn submit(&mut self) -> Result<(), ScraperError>;
}

/// A controllable page within the browsing session.
#[async_trait]
pub trait PageHandle: Send {
    type Input: InputHandle;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Tries `selectors` in priority order, waiting up to `timeout` for each
    /// to become visible; the first match wins. `Ok(None)` means no candidate
    /// showed up — a per-query condition, distinct from a page-level error.
    async fn find_visible(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<Option<Self::Input>, ScraperError>;
}

/// Read-mostly view of the scrollable result feed.
#[async_trait]
pub trait FeedProbe: Send {
    /// Best-effort end-of-results check; `true` means "keep going". Callers
    /// treat errors as "cannot determine", never as termination.
    async fn has_more_likely(&mut self) -> Result<bool, ScraperError>;

    /// Scrolls the feed forward by `pixels`.
    async fn advance(&mut self, pixels: u32) -> Result<(), ScraperError>;
}
