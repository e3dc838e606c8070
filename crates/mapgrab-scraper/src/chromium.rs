//! Chromium-backed implementations of the page capabilities.
//!
//! Everything here goes through the DevTools protocol: element lookups and
//! scrolling are JS evaluations, typing and submit are synthesized key
//! events. No extraction happens on this side — the in-page agent owns
//! that — so the surface stays small: launch, navigate, find, type, scroll.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfigBuilder};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::ScraperError;
use crate::page::{FeedProbe, InputHandle, PageHandle};

const VISIBILITY_POLL: Duration = Duration::from_millis(250);

/// Launch options for the browsing session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Persistent profile directory; a browser-managed temporary profile is
    /// used when unset.
    pub profile_dir: Option<PathBuf>,
    /// Explicit browser executable; auto-detected when unset.
    pub executable: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: false,
            profile_dir: None,
            executable: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// An isolated browsing session: the browser process plus its CDP event
/// handler task. The handler task must outlive every page interaction, so
/// it is tracked here and stopped on [`BrowserSession::close`].
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches the browser.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] when the executable cannot be found
    /// or the process fails to start — callers treat this as fatal.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(options.request_timeout)
            .window_size(1920, 1080)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--disable-background-networking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if let Some(dir) = &options.profile_dir {
            std::fs::create_dir_all(dir).map_err(|e| ScraperError::Launch {
                reason: format!("cannot create profile directory: {e}"),
            })?;
            builder = builder.user_data_dir(dir);
        }
        if let Some(exe) = &options.executable {
            builder = builder.chrome_executable(exe);
        }
        if !options.headless {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|reason| ScraperError::Launch { reason })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Launch {
                reason: e.to_string(),
            })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser event handler error");
                }
            }
            tracing::debug!("browser event handler finished");
        });

        tracing::info!("browser ready");
        Ok(Self { browser, handler })
    }

    /// Opens a fresh tab, returning the page handle and the feed probe bound
    /// to the same tab.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Protocol`] if the tab cannot be created.
    pub async fn open_page(
        &self,
        nav_timeout: Duration,
        feed_end_marker: &str,
    ) -> Result<(ChromiumPage, ChromiumFeed), ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::Protocol {
                reason: e.to_string(),
            })?;

        Ok((
            ChromiumPage {
                page: page.clone(),
                nav_timeout,
            },
            ChromiumFeed {
                page,
                end_marker: feed_end_marker.to_owned(),
            },
        ))
    }

    /// Shuts the browser down and stops the event handler task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close failed");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
        tracing::info!("browser closed");
    }
}

/// [`PageHandle`] over a Chromium tab.
pub struct ChromiumPage {
    page: Page,
    nav_timeout: Duration,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    type Input = ChromiumInput;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        let navigation = self.page.goto(url);
        match tokio::time::timeout(self.nav_timeout, navigation).await {
            Ok(Ok(_)) => {
                // Best effort: some pages keep loading subresources forever.
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScraperError::NavigationTimeout {
                url: url.to_owned(),
                timeout: self.nav_timeout,
            }),
        }
    }

    async fn find_visible(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<Option<ChromiumInput>, ScraperError> {
        for selector in selectors {
            if wait_until_visible(&self.page, selector, timeout).await? {
                tracing::debug!(selector, "search input located");
                return Ok(Some(ChromiumInput {
                    page: self.page.clone(),
                    selector: (*selector).to_owned(),
                }));
            }
        }
        Ok(None)
    }
}

/// [`InputHandle`] bound to a selector on a Chromium tab.
pub struct ChromiumInput {
    page: Page,
    selector: String,
}

#[async_trait]
impl InputHandle for ChromiumInput {
    async fn clear(&mut self) -> Result<(), ScraperError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             if (!el) return false; \
             el.click(); el.focus(); el.value = ''; return true; }})()",
            sel = js_string(&self.selector)
        );
        if eval_bool(&self.page, &script).await? {
            Ok(())
        } else {
            Err(ScraperError::ElementGone {
                selector: self.selector.clone(),
            })
        }
    }

    async fn type_char(&mut self, c: char, delay: Duration) -> Result<(), ScraperError> {
        tokio::time::sleep(delay).await;
        let params = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::Char)
            .text(c.to_string())
            .build()
            .map_err(|reason| ScraperError::Protocol { reason })?;
        self.page
            .execute(params)
            .await
            .map_err(|e| ScraperError::Protocol {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), ScraperError> {
        for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let params = DispatchKeyEventParams::builder()
                .r#type(kind)
                .key("Enter")
                .build()
                .map_err(|reason| ScraperError::Protocol { reason })?;
            self.page
                .execute(params)
                .await
                .map_err(|e| ScraperError::Protocol {
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// [`FeedProbe`] over the `[role="feed"]` results container.
///
/// `end_marker` is the style fragment that identifies the feed's terminal
/// sentinel element. It is site-version-specific, which is why it arrives
/// from configuration instead of living here as a constant.
pub struct ChromiumFeed {
    page: Page,
    end_marker: String,
}

#[async_trait]
impl FeedProbe for ChromiumFeed {
    async fn has_more_likely(&mut self) -> Result<bool, ScraperError> {
        let script = format!(
            "(() => {{ const feed = document.querySelector('[role=\"feed\"]'); \
             if (!feed) return true; \
             const last = feed.lastElementChild; \
             if (!last) return true; \
             const style = last.getAttribute('style') || ''; \
             return !style.includes({marker}); }})()",
            marker = js_string(&self.end_marker)
        );
        eval_bool(&self.page, &script).await
    }

    async fn advance(&mut self, pixels: u32) -> Result<(), ScraperError> {
        let script = format!(
            "(() => {{ const feed = document.querySelector('[role=\"feed\"]'); \
             if (feed) {{ feed.scrollBy({{top: {pixels}, behavior: 'smooth'}}); }} \
             else {{ window.scrollBy(0, {pixels}); }} }})()"
        );
        eval_unit(&self.page, &script).await
    }
}

async fn wait_until_visible(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<bool, ScraperError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if is_visible(page, selector).await? {
            return Ok(true);
        }
        if tokio::time::Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(VISIBILITY_POLL).await;
    }
}

async fn is_visible(page: &Page, selector: &str) -> Result<bool, ScraperError> {
    let script = format!(
        "(() => {{ const el = document.querySelector({sel}); \
         return !!el && el.offsetParent !== null; }})()",
        sel = js_string(selector)
    );
    eval_bool(page, &script).await
}

async fn eval_bool(page: &Page, script: &str) -> Result<bool, ScraperError> {
    let result = page
        .evaluate(script)
        .await
        .map_err(|e| ScraperError::Evaluate {
            reason: e.to_string(),
        })?;
    result.into_value::<bool>().map_err(|e| ScraperError::Evaluate {
        reason: e.to_string(),
    })
}

async fn eval_unit(page: &Page, script: &str) -> Result<(), ScraperError> {
    page.evaluate(script)
        .await
        .map_err(|e| ScraperError::Evaluate {
            reason: e.to_string(),
        })?;
    Ok(())
}

/// Quotes `value` as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}
