use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level configuration shared by the server and CLI binaries.
///
/// Pacing knobs live in [`crate::RateLimitPolicy`], which the CLI builds
/// from its own flags; this struct covers everything else.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Ingestion server bind address.
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Append-only sink destination.
    pub sink_path: PathBuf,
    /// Page the controller navigates to before searching.
    pub maps_url: String,
    pub browser_headless: bool,
    /// Persistent browser profile directory; a throwaway one is used when unset.
    pub profile_dir: Option<PathBuf>,
    /// Explicit browser executable; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
    pub nav_timeout_secs: u64,
    /// Per-selector visibility wait when locating the search input.
    pub input_wait_ms: u64,
    /// Pause after submitting a search before scrolling begins.
    pub results_settle_secs: u64,
    /// Style fragment that marks the feed's end-of-results sentinel element.
    pub feed_end_marker: String,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}
