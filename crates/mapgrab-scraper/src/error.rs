use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser launch failed: {reason}")]
    Launch { reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("script evaluation failed: {reason}")]
    Evaluate { reason: String },

    #[error("devtools command failed: {reason}")]
    Protocol { reason: String },

    #[error("search input not found after trying {selectors} selector(s)")]
    InputNotFound { selectors: usize },

    #[error("element for selector \"{selector}\" disappeared")]
    ElementGone { selector: String },
}
