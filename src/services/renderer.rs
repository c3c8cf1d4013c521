//! Page loading for the search surface.
//!
//! The search page fills in its results client-side, so loading it means
//! waiting until a selector matches. A renderer returns `Ok(None)` when the
//! wait runs out; that is a normal "nothing here" result, not an error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use scraper::Html;

use crate::error::Result;
use crate::models::{Config, RendererKind};
use crate::utils::http::fetch_text;
use crate::utils::parse_selector;

/// Loads a page and waits for content to appear.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url` and return its HTML once `ready_selector` matches.
    ///
    /// Returns `Ok(None)` if nothing matched within `wait`.
    async fn render(&self, url: &str, ready_selector: &str, wait: Duration)
    -> Result<Option<String>>;
}

/// Check whether `html` contains at least one element matching `selector`.
pub fn contains_match(html: &str, selector: &str) -> Result<bool> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().is_some())
}

/// Plain HTTP renderer. Re-fetches the page until the selector matches.
pub struct HttpRenderer {
    client: reqwest::Client,
    poll_interval: Duration,
}

impl HttpRenderer {
    pub fn new(client: reqwest::Client, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(
        &self,
        url: &str,
        ready_selector: &str,
        wait: Duration,
    ) -> Result<Option<String>> {
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            let html = fetch_text(&self.client, url).await?;
            if contains_match(&html, ready_selector)? {
                log::debug!("'{}' present after {} fetch(es)", ready_selector, attempt);
                return Ok(Some(html));
            }

            let elapsed = started.elapsed();
            if elapsed >= wait {
                return Ok(None);
            }
            tokio::time::sleep(self.poll_interval.min(wait - elapsed)).await;
            attempt += 1;
        }
    }
}

#[cfg(feature = "browser")]
pub use chrome::ChromeRenderer;

#[cfg(feature = "browser")]
mod chrome {
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use std::time::Duration;

    use async_trait::async_trait;
    use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
    use headless_chrome::{Browser, LaunchOptions, Tab};

    use super::PageRenderer;
    use crate::error::{AppError, Result};

    const WINDOW_SIZE: (u32, u32) = (1920, 1080);

    /// Headless Chrome renderer. Runs client-side scripts before reading the page.
    #[derive(Debug, Clone)]
    pub struct ChromeRenderer {
        user_agent: String,
        page_load_timeout: Duration,
        screenshot_on_error: Option<PathBuf>,
    }

    impl ChromeRenderer {
        pub fn new(
            user_agent: impl Into<String>,
            page_load_timeout: Duration,
            screenshot_on_error: Option<PathBuf>,
        ) -> Self {
            Self {
                user_agent: user_agent.into(),
                page_load_timeout,
                screenshot_on_error,
            }
        }

        fn render_blocking(
            &self,
            url: &str,
            ready_selector: &str,
            wait: Duration,
        ) -> Result<Option<String>> {
            let mut builder = LaunchOptions::default_builder();
            builder
                .headless(true)
                .window_size(Some(WINDOW_SIZE))
                .args(vec![
                    OsStr::new("--no-sandbox"),
                    OsStr::new("--disable-dev-shm-usage"),
                ]);
            let options = builder.build().map_err(|e| AppError::render(url, e))?;

            let browser = Browser::new(options).map_err(|e| AppError::render(url, e))?;
            let tab = browser.new_tab().map_err(|e| AppError::render(url, e))?;
            tab.set_default_timeout(self.page_load_timeout);
            tab.set_user_agent(&self.user_agent, None, None)
                .map_err(|e| AppError::render(url, e))?;

            let result = Self::load(&tab, url, ready_selector, wait);
            if needs_screenshot(&result) {
                self.save_screenshot(&tab);
            }
            result
        }

        fn load(tab: &Tab, url: &str, ready_selector: &str, wait: Duration) -> Result<Option<String>> {
            tab.navigate_to(url).map_err(|e| AppError::render(url, e))?;

            if let Err(e) = tab.wait_for_element_with_custom_timeout(ready_selector, wait) {
                log::debug!("'{}' never appeared on {}: {}", ready_selector, url, e);
                return Ok(None);
            }

            let html = tab.get_content().map_err(|e| AppError::render(url, e))?;
            Ok(Some(html))
        }

        fn save_screenshot(&self, tab: &Tab) {
            let Some(path) = &self.screenshot_on_error else {
                return;
            };
            let saved = tab
                .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|e| e.to_string())
                .and_then(|png| std::fs::write(path, png).map_err(|e| e.to_string()));
            match saved {
                Ok(()) => log::warn!("Saved debug screenshot to {}", path.display()),
                Err(e) => log::warn!("Could not save debug screenshot: {}", e),
            }
        }
    }

    /// A timed-out wait is as worth a screenshot as a failed load.
    fn needs_screenshot(result: &Result<Option<String>>) -> bool {
        !matches!(result, Ok(Some(_)))
    }

    #[async_trait]
    impl PageRenderer for ChromeRenderer {
        async fn render(
            &self,
            url: &str,
            ready_selector: &str,
            wait: Duration,
        ) -> Result<Option<String>> {
            let this = self.clone();
            let url_owned = url.to_string();
            let selector = ready_selector.to_string();

            tokio::task::spawn_blocking(move || this.render_blocking(&url_owned, &selector, wait))
                .await
                .map_err(|e| AppError::render(url, e))?
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn screenshot_on_timeout_and_error() {
            assert!(needs_screenshot(&Ok(None)));
            assert!(needs_screenshot(&Err(AppError::render("u", "crashed"))));
            assert!(!needs_screenshot(&Ok(Some("<html></html>".to_string()))));
        }
    }
}

/// Build the renderer selected in the configuration.
pub fn build_renderer(config: &Config, client: reqwest::Client) -> Result<Box<dyn PageRenderer>> {
    match config.search.renderer {
        RendererKind::Http => Ok(Box::new(HttpRenderer::new(
            client,
            config.search.poll_interval(),
        ))),
        #[cfg(feature = "browser")]
        RendererKind::Browser => Ok(Box::new(ChromeRenderer::new(
            config.http.user_agent.clone(),
            Duration::from_secs(config.http.timeout_secs.max(30)),
            config.search.screenshot_on_error.clone(),
        ))),
        #[cfg(not(feature = "browser"))]
        RendererKind::Browser => Err(crate::error::AppError::config(
            "search.renderer = \"browser\" requires building with the `browser` feature",
        )),
    }
}
