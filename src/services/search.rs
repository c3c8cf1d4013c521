// src/services/search.rs

//! Candidate search service.
//!
//! Queries the site's search page for a keyword and collects recipe links in
//! page order.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{RecipeId, SearchConfig};
use crate::services::PageRenderer;
use crate::utils::{parse_selector, resolve_url};

/// Anything that can turn a keyword into an ordered list of candidates.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Candidates for `keyword`, most relevant first. Failures yield an empty list.
    async fn search(&self, keyword: &str) -> Vec<RecipeId>;
}

/// Service for searching the recipe site.
pub struct CandidateSearch {
    config: SearchConfig,
    site_base: Url,
    renderer: Box<dyn PageRenderer>,
}

impl CandidateSearch {
    /// Create a new search service with the given configuration.
    pub fn new(config: SearchConfig, renderer: Box<dyn PageRenderer>) -> Result<Self> {
        let site_base = Url::parse(&config.site_base)?;
        Ok(Self {
            config,
            site_base,
            renderer,
        })
    }

    async fn try_search(&self, keyword: &str) -> Result<Vec<RecipeId>> {
        let url = self.config.search_url(keyword)?;
        let ready = self.config.link_selector();
        log::debug!("Waiting up to {:?} for recipes on {}", self.config.wait(), url);

        let Some(html) = self
            .renderer
            .render(url.as_str(), &ready, self.config.wait())
            .await?
        else {
            log::warn!(
                "No recipe appeared for '{}' within {:?}",
                keyword,
                self.config.wait()
            );
            return Ok(Vec::new());
        };

        let links = self.collect_links(&html)?;
        if links.is_empty() {
            log::warn!("No recipe links found for '{}'. The page layout may have changed.", keyword);
        }
        Ok(links)
    }

    /// Extract recipe links from a rendered result page.
    ///
    /// Links are resolved against the site base and deduplicated, keeping the
    /// first occurrence.
    pub fn collect_links(&self, html: &str) -> Result<Vec<RecipeId>> {
        let selector = parse_selector(&self.config.link_selector())?;
        let document = Html::parse_document(html);

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.starts_with(&self.config.recipe_path_prefix) {
                continue;
            }
            let id = RecipeId::new(resolve_url(&self.site_base, href));
            if seen.insert(id.clone()) {
                links.push(id);
            }
        }
        Ok(links)
    }
}

#[async_trait]
impl CandidateSource for CandidateSearch {
    async fn search(&self, keyword: &str) -> Vec<RecipeId> {
        log::info!("Searching recipes for '{}'...", keyword);
        match self.try_search(keyword).await {
            Ok(links) => {
                log::info!("Found {} candidate(s) for '{}'", links.len(), keyword);
                links
            }
            Err(e) => {
                log::warn!("Search failed for '{}': {}", keyword, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::services::HttpRenderer;
    use crate::utils::http::create_async_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <ul id="search-results">
            <li><a href="/vn/cong-thuc/111-tao-chile-xao">Tảo chile xào</a>
                <a href="/vn/cong-thuc/111-tao-chile-xao"><img src="a.jpg"></a></li>
            <li><a href="/vn/cong-thuc/222-canh-tao">Canh tảo</a></li>
            <li><a href="/vn/nguoi-dung/9">Profile</a></li>
            <li><a href="/vn/cong-thuc/333-goi-tao">Gỏi tảo</a></li>
          </ul>
        </body></html>
    "#;

    fn search_for(server: &MockServer, wait_secs: u64) -> CandidateSearch {
        let config = SearchConfig {
            url_template: format!("{}/vn/tim-kiem/{{keyword}}", server.uri()),
            site_base: "https://cookpad.com".to_string(),
            wait_secs,
            poll_interval_ms: 100,
            ..SearchConfig::default()
        };
        let client = create_async_client(&HttpConfig::default()).unwrap();
        let renderer = HttpRenderer::new(client, config.poll_interval());
        CandidateSearch::new(config, Box::new(renderer)).unwrap()
    }

    fn ids(urls: &[&str]) -> Vec<RecipeId> {
        urls.iter().map(|u| RecipeId::from(*u)).collect()
    }

    #[test]
    fn collect_links_keeps_order_and_dedups() {
        let config = SearchConfig::default();
        let client = create_async_client(&HttpConfig::default()).unwrap();
        let renderer = HttpRenderer::new(client, Duration::from_millis(10));
        let search = CandidateSearch::new(config, Box::new(renderer)).unwrap();

        let links = search.collect_links(RESULTS_PAGE).unwrap();
        assert_eq!(
            links,
            ids(&[
                "https://cookpad.com/vn/cong-thuc/111-tao-chile-xao",
                "https://cookpad.com/vn/cong-thuc/222-canh-tao",
                "https://cookpad.com/vn/cong-thuc/333-goi-tao",
            ])
        );
    }

    #[tokio::test]
    async fn search_returns_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex("^/vn/tim-kiem/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let links = search_for(&server, 2).search("tảo chile").await;
        assert_eq!(links.len(), 3);
        assert_eq!(
            links[0].as_str(),
            "https://cookpad.com/vn/cong-thuc/111-tao-chile-xao"
        );
    }

    #[tokio::test]
    async fn search_failure_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(search_for(&server, 1).search("nấm").await.is_empty());
    }

    #[tokio::test]
    async fn search_timeout_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div>Đang tải...</div>"))
            .mount(&server)
            .await;

        assert!(search_for(&server, 1).search("nấm").await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_empty() {
        let config = SearchConfig {
            url_template: "http://127.0.0.1:9/vn/tim-kiem/{keyword}".to_string(),
            wait_secs: 1,
            ..SearchConfig::default()
        };
        let client = create_async_client(&HttpConfig::default()).unwrap();
        let renderer = HttpRenderer::new(client, config.poll_interval());
        let search = CandidateSearch::new(config, Box::new(renderer)).unwrap();

        assert!(search.search("tảo").await.is_empty());
    }
}
