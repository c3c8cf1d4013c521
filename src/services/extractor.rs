// src/services/extractor.rs

//! Recipe extractor service.
//!
//! A recipe is assembled from two independent sources on the same page:
//! - title and ingredients from the rendered markup, via a [`MarkupLayout`]
//! - steps and image from the embedded JSON-LD Recipe block
//!
//! The merged draft is validated once at the end. Any empty field discards the
//! whole record.

use async_trait::async_trait;
use scraper::Html;

use crate::error::Result;
use crate::models::{RecipeDraft, RecipeId, RecipeRecord};
use crate::services::structured::structured_fields;
use crate::utils::http::fetch_text;
use crate::utils::{parse_selector, stripped_text};

/// Anything that can turn a candidate into a usable recipe.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// `None` when the page cannot be fetched or a required field is missing.
    async fn extract(&self, id: &RecipeId) -> Option<RecipeRecord>;
}

/// Markup rules for one site family.
///
/// A layout change on the site only needs a new implementation.
pub trait MarkupLayout: Send + Sync {
    fn name(&self) -> &'static str;

    fn title(&self, document: &Html) -> Result<String>;

    /// Ingredient lines in document order, newline-separated.
    fn ingredients(&self, document: &Html) -> Result<String>;
}

/// Cookpad recipe page layout.
#[derive(Debug, Clone, Default)]
pub struct CookpadLayout;

impl CookpadLayout {
    const TITLE: &'static str = "h1";
    const INGREDIENT: &'static str = "li[id^='ingredient_']";
}

impl MarkupLayout for CookpadLayout {
    fn name(&self) -> &'static str {
        "cookpad"
    }

    fn title(&self, document: &Html) -> Result<String> {
        let selector = parse_selector(Self::TITLE)?;
        Ok(document
            .select(&selector)
            .next()
            .map(|h1| stripped_text(h1.text()))
            .unwrap_or_default())
    }

    fn ingredients(&self, document: &Html) -> Result<String> {
        let selector = parse_selector(Self::INGREDIENT)?;
        Ok(document
            .select(&selector)
            .map(|li| li.text().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Service for fetching and parsing recipe pages.
pub struct RecipeExtractor {
    client: reqwest::Client,
    layout: Box<dyn MarkupLayout>,
}

impl RecipeExtractor {
    pub fn new(client: reqwest::Client, layout: Box<dyn MarkupLayout>) -> Self {
        Self { client, layout }
    }

    /// Extractor for Cookpad pages.
    pub fn cookpad(client: reqwest::Client) -> Self {
        Self::new(client, Box::new(CookpadLayout))
    }

    /// Gather every field the page offers, without validating.
    pub fn draft(&self, html: &str) -> Result<RecipeDraft> {
        let document = Html::parse_document(html);
        let structured = structured_fields(&document)?;

        Ok(RecipeDraft {
            title: self.layout.title(&document)?,
            ingredients: self.layout.ingredients(&document)?,
            steps: structured.steps,
            image_url: structured.image_url,
        })
    }

    /// Parse a page into a valid record, logging why it was rejected otherwise.
    pub fn parse(&self, html: &str) -> Option<RecipeRecord> {
        let draft = match self.draft(html) {
            Ok(draft) => draft,
            Err(e) => {
                log::warn!("Could not parse recipe page ({}): {}", self.layout.name(), e);
                return None;
            }
        };

        match draft.finish() {
            Ok(record) => Some(record),
            Err(missing) => {
                log::warn!("Recipe is missing: {}", missing.join(", "));
                None
            }
        }
    }
}

#[async_trait]
impl RecipeSource for RecipeExtractor {
    async fn extract(&self, id: &RecipeId) -> Option<RecipeRecord> {
        log::info!("Fetching recipe details from {} ...", id);

        let html = match fetch_text(&self.client, id.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Failed to fetch recipe {}: {}", id, e);
                return None;
            }
        };

        let record = self.parse(&html)?;
        log::info!("Image URL: {}", record.image_url);
        Some(record)
    }
}
