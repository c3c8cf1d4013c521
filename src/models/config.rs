//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::encode_path_segment;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Search surface and page loading
    #[serde(default)]
    pub search: SearchConfig,

    /// Priority keywords
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Posted-set persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Text-compose service
    #[serde(default)]
    pub compose: ComposeConfig,

    /// Publish service
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.search.wait_secs == 0 {
            return Err(AppError::validation("search.wait_secs must be > 0"));
        }
        if self.search.poll_interval_ms == 0 {
            return Err(AppError::validation("search.poll_interval_ms must be > 0"));
        }
        if !self.search.url_template.contains("{keyword}") {
            return Err(AppError::validation(
                "search.url_template must contain {keyword}",
            ));
        }
        if !self.search.recipe_path_prefix.starts_with('/') {
            return Err(AppError::validation(
                "search.recipe_path_prefix must start with '/'",
            ));
        }
        Url::parse(&self.search.site_base)?;
        Url::parse(&self.compose.api_base)?;
        Url::parse(&self.publish.graph_api_base)?;
        if self.selection.keywords.is_empty() {
            return Err(AppError::validation("No keywords defined"));
        }
        if self.selection.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(AppError::validation("selection.keywords contains a blank entry"));
        }
        if self.storage.posted_file.trim().is_empty() {
            return Err(AppError::validation("storage.posted_file is empty"));
        }
        if self.compose.model.trim().is_empty() {
            return Err(AppError::validation("compose.model is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings shared by every outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Connect + read timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// How the search result page is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Plain HTTP GET, re-fetched until a recipe link shows up.
    /// Only sees results that are present in the served HTML.
    Http,
    /// Headless Chrome, runs the page's scripts (requires the `browser` feature)
    Browser,
}

impl Default for RendererKind {
    /// Chrome whenever it is compiled in.
    fn default() -> Self {
        if cfg!(feature = "browser") {
            Self::Browser
        } else {
            Self::Http
        }
    }
}

/// Search surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search URL with a `{keyword}` placeholder
    #[serde(default = "defaults::url_template")]
    pub url_template: String,

    /// Base URL that recipe hrefs are resolved against
    #[serde(default = "defaults::site_base")]
    pub site_base: String,

    /// Path prefix every recipe link starts with
    #[serde(default = "defaults::recipe_path_prefix")]
    pub recipe_path_prefix: String,

    /// Maximum wait for the first recipe link, in seconds
    #[serde(default = "defaults::wait")]
    pub wait_secs: u64,

    /// Delay between readiness checks, in milliseconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub renderer: RendererKind,

    /// Where the browser renderer saves a screenshot when a page fails or
    /// no recipe link appears in time
    #[serde(default = "defaults::screenshot_on_error")]
    pub screenshot_on_error: Option<PathBuf>,
}

impl SearchConfig {
    /// Build the search URL for a keyword.
    ///
    /// The keyword is encoded as one path segment, so reserved characters in
    /// it cannot change the shape of the URL.
    pub fn search_url(&self, keyword: &str) -> Result<Url> {
        let keyword = encode_path_segment(keyword.trim())?;
        Ok(Url::parse(&self.url_template.replace("{keyword}", &keyword))?)
    }

    /// CSS selector matching recipe links on the result page.
    pub fn link_selector(&self) -> String {
        format!("a[href^='{}']", self.recipe_path_prefix)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url_template: defaults::url_template(),
            site_base: defaults::site_base(),
            recipe_path_prefix: defaults::recipe_path_prefix(),
            wait_secs: defaults::wait(),
            poll_interval_ms: defaults::poll_interval(),
            renderer: RendererKind::default(),
            screenshot_on_error: defaults::screenshot_on_error(),
        }
    }
}

/// Priority keyword list. Earlier keywords win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
        }
    }
}

/// Posted-set persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Newline-delimited list of published recipe URLs
    #[serde(default = "defaults::posted_file")]
    pub posted_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            posted_file: defaults::posted_file(),
        }
    }
}

/// Gemini compose settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    #[serde(default = "defaults::compose_api_base")]
    pub api_base: String,

    #[serde(default = "defaults::compose_model")]
    pub model: String,

    /// Page name used in the post header and intro
    #[serde(default = "defaults::page_name")]
    pub page_name: String,

    /// Link appended to the end of every post
    #[serde(default = "defaults::share_link")]
    pub share_link: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::compose_api_base(),
            model: defaults::compose_model(),
            page_name: defaults::page_name(),
            share_link: defaults::share_link(),
        }
    }
}

/// Facebook Graph publish settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "defaults::graph_api_base")]
    pub graph_api_base: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            graph_api_base: defaults::graph_api_base(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Search defaults
    pub fn url_template() -> String {
        "https://cookpad.com/vn/tim-kiem/{keyword}".into()
    }
    pub fn site_base() -> String {
        "https://cookpad.com".into()
    }
    pub fn recipe_path_prefix() -> String {
        "/vn/cong-thuc/".into()
    }
    pub fn wait() -> u64 {
        10
    }
    pub fn poll_interval() -> u64 {
        1000
    }
    pub fn screenshot_on_error() -> Option<std::path::PathBuf> {
        Some("debug_screenshot.png".into())
    }

    // Selection defaults
    pub fn keywords() -> Vec<String> {
        vec![
            "tảo chile".into(),
            "sườn non chay".into(),
            "rong biển sấy mè".into(),
            "nấm lộc nhung".into(),
        ]
    }

    // Storage defaults
    pub fn posted_file() -> String {
        "posted_recipes.txt".into()
    }

    // Compose defaults
    pub fn compose_api_base() -> String {
        "https://generativelanguage.googleapis.com".into()
    }
    pub fn compose_model() -> String {
        "gemini-2.5-flash".into()
    }
    pub fn page_name() -> String {
        "An Thảo".into()
    }
    pub fn share_link() -> String {
        "https://www.facebook.com/share/p/1AU1vXZR2V/".into()
    }

    // Publish defaults
    pub fn graph_api_base() -> String {
        "https://graph.facebook.com".into()
    }
}
