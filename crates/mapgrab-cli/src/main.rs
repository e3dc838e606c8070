mod input;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mapgrab_core::{expand_queries, Query, RateLimitPolicy};
use mapgrab_scraper::chromium::{BrowserOptions, BrowserSession};
use mapgrab_scraper::SearchSession;

#[derive(Debug, Parser)]
#[command(name = "mapgrab-cli")]
#[command(about = "Drives paced map searches; records are collected by the ingestion server")]
struct Cli {
    /// CSV file with `search,location,country` rows.
    input: PathBuf,

    /// Run the browser without a window.
    #[arg(long)]
    headless: bool,

    /// Persistent browser profile directory.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Page to open before searching (defaults to the configured maps URL).
    #[arg(long)]
    maps_url: Option<String>,

    /// Minimum delay between searches, in seconds.
    #[arg(long, default_value_t = 5.0)]
    min_delay: f64,

    /// Maximum delay between searches, in seconds.
    #[arg(long, default_value_t = 15.0)]
    max_delay: f64,

    /// Scroll steps per search.
    #[arg(long, default_value_t = 15)]
    scrolls: u32,

    /// Pixels per scroll step.
    #[arg(long, default_value_t = 2000)]
    scroll_pixels: u32,

    /// Minimum seconds between scroll steps.
    #[arg(long, default_value_t = 1.5)]
    scroll_interval_min: f64,

    /// Maximum seconds between scroll steps.
    #[arg(long, default_value_t = 3.0)]
    scroll_interval_max: f64,

    /// Disable auto-scroll after each search.
    #[arg(long)]
    no_auto_scroll: bool,
}

impl Cli {
    fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            min_search_delay_secs: self.min_delay,
            max_search_delay_secs: self.max_delay,
            scroll_interval_min_secs: self.scroll_interval_min,
            scroll_interval_max_secs: self.scroll_interval_max,
            scroll_pixels_per_step: self.scroll_pixels,
            max_scroll_steps: self.scrolls,
            auto_scroll_enabled: !self.no_auto_scroll,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = mapgrab_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let policy = cli.policy();
    policy.validate()?;

    let inputs = input::read_query_inputs(&cli.input)?;
    let queries = expand_queries(&inputs.terms, &inputs.locations)?;
    print_plan(&queries);

    let options = BrowserOptions {
        headless: cli.headless || config.browser_headless,
        profile_dir: cli.profile.clone().or_else(|| config.profile_dir.clone()),
        executable: config.chrome_executable.clone(),
        ..BrowserOptions::default()
    };

    // Startup failures here are fatal: without a page there is nothing to drive.
    let browser = BrowserSession::launch(&options).await?;
    let (page, feed) = browser
        .open_page(
            Duration::from_secs(config.nav_timeout_secs),
            &config.feed_end_marker,
        )
        .await?;

    let mut session = SearchSession::new(page, feed, policy)
        .with_input_wait(Duration::from_millis(config.input_wait_ms))
        .with_results_settle(Duration::from_secs(config.results_settle_secs));

    let maps_url = cli.maps_url.unwrap_or_else(|| config.maps_url.clone());
    if let Err(err) = session.navigate(&maps_url).await {
        browser.close().await;
        return Err(err.into());
    }

    let summary = session.run(&queries).await;
    tracing::info!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "run complete"
    );
    println!(
        "Done: {}/{} searches succeeded. Check the ingestion server for collected records.",
        summary.succeeded, summary.attempted
    );

    browser.close().await;
    Ok(())
}

fn print_plan(queries: &[Query]) {
    println!("Expanded {} queries:", queries.len());
    for (i, query) in queries.iter().take(5).enumerate() {
        println!("  {}. {}", i + 1, query.rendered_text);
    }
    if queries.len() > 5 {
        println!("  ... and {} more", queries.len() - 5);
    }
}
