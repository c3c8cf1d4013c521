// src/pipeline/run.rs

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Credentials, RecipeRecord, Selection};
use crate::services::{
    CandidateSearch, CandidateSource, Composer, FacebookPublisher, GeminiComposer, Publisher,
    RecipeExtractor, RecipeSource, SelectionPolicy, build_renderer,
};
use crate::storage::{LocalPostedStore, PostedStore};
use crate::utils::{banner, http};

use super::outcome::{RunMode, RunOutcome};

const TOTAL_STEPS: usize = 5;

/// One scheduled invocation: select, extract, compose, publish, record.
pub struct Pipeline {
    store: Box<dyn PostedStore>,
    search: Box<dyn CandidateSource>,
    extractor: Box<dyn RecipeSource>,
    composer: Box<dyn Composer>,
    publisher: Box<dyn Publisher>,
    policy: SelectionPolicy,
}

impl Pipeline {
    pub fn new(
        store: Box<dyn PostedStore>,
        search: Box<dyn CandidateSource>,
        extractor: Box<dyn RecipeSource>,
        composer: Box<dyn Composer>,
        publisher: Box<dyn Publisher>,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            store,
            search,
            extractor,
            composer,
            publisher,
            policy,
        }
    }

    /// Wire the production services from configuration and credentials.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        let renderer = build_renderer(config, client.clone())?;

        Ok(Self::new(
            Box::new(LocalPostedStore::new(&config.storage.posted_file)),
            Box::new(CandidateSearch::new(config.search.clone(), renderer)?),
            Box::new(RecipeExtractor::cookpad(client.clone())),
            Box::new(GeminiComposer::new(
                client.clone(),
                config.compose.clone(),
                credentials.google_api_key.clone(),
            )),
            Box::new(FacebookPublisher::new(
                client,
                config.publish.clone(),
                credentials.page_id.clone(),
                credentials.page_access_token.clone(),
            )),
            SelectionPolicy::new(config.selection.keywords.clone()),
        ))
    }

    /// Run once and report how it ended.
    pub async fn run(&self, mode: RunMode) -> RunOutcome {
        let started = Utc::now();
        banner::header(match mode {
            RunMode::Live => "Recipe post run",
            RunMode::DryRun => "Recipe post run (dry run)",
        });

        let outcome = self.execute(mode).await;

        let elapsed = Utc::now() - started;
        let mut items = vec![
            ("Outcome", outcome.label().to_string()),
            ("Detail", outcome.reason()),
        ];
        if let Some(selection) = outcome.selection() {
            items.push(("Keyword", selection.keyword.clone()));
            items.push(("Recipe", selection.recipe_id.to_string()));
        }
        items.push((
            "Elapsed",
            format!("{:.1}s", elapsed.num_milliseconds() as f64 / 1000.0),
        ));
        banner::summary("Run finished", &items);

        if outcome.is_success() {
            log::info!("{}", outcome.reason());
        } else {
            log::error!("{}", outcome.reason());
        }
        outcome
    }

    async fn execute(&self, mode: RunMode) -> RunOutcome {
        banner::step(1, TOTAL_STEPS, "Load posted recipes");
        let posted = match self.store.load().await {
            Ok(posted) => posted,
            Err(e) => {
                return RunOutcome::StateUnavailable {
                    reason: e.to_string(),
                };
            }
        };
        log::info!(
            "{} recipe(s) already posted ({})",
            posted.len(),
            self.store.location()
        );

        banner::step(2, TOTAL_STEPS, "Select a new recipe");
        let Some(selection) = self.policy.select(self.search.as_ref(), &posted).await else {
            return RunOutcome::NothingNew;
        };

        banner::step(3, TOTAL_STEPS, "Extract recipe details");
        let Some(recipe) = self.extractor.extract(&selection.recipe_id).await else {
            return RunOutcome::ExtractionFailed { selection };
        };
        log::info!("Extracted '{}'", recipe.title);

        banner::step(4, TOTAL_STEPS, "Compose the post");
        let post = match self.composer.compose(&recipe).await {
            Ok(post) => post,
            Err(e) => {
                return RunOutcome::ComposeFailed {
                    selection,
                    reason: e.to_string(),
                };
            }
        };

        if mode == RunMode::DryRun {
            log::info!("Composed post:\n{}", post);
            return RunOutcome::DryRun {
                selection,
                recipe,
                post,
            };
        }

        banner::step(5, TOTAL_STEPS, "Publish and record");
        self.publish_and_record(selection, &recipe, &post).await
    }

    /// The id is recorded only after the page accepted the post.
    async fn publish_and_record(
        &self,
        selection: Selection,
        recipe: &RecipeRecord,
        post: &str,
    ) -> RunOutcome {
        let receipt = match self.publisher.publish(post, &recipe.image_url).await {
            Ok(receipt) => receipt,
            Err(e) => {
                return RunOutcome::PublishFailed {
                    selection,
                    reason: e.to_string(),
                };
            }
        };

        match self.store.append(&selection.recipe_id).await {
            Ok(()) => {
                log::info!(
                    "Recorded {} in {}",
                    selection.recipe_id,
                    self.store.location()
                );
                RunOutcome::Published { selection, receipt }
            }
            Err(e) => RunOutcome::PublishedNotRecorded {
                selection,
                reason: e.to_string(),
            },
        }
    }
}
