//! Selection policy.
//!
//! Walks the priority keywords in order. Each keyword's candidates are checked
//! in page order and the first one not yet posted is chosen. Candidates are
//! only checked against the posted set; extractability is not pre-validated.

use crate::models::{PostedSet, Selection};
use crate::services::CandidateSource;

/// Chooses one unposted recipe across the priority keywords.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    keywords: Vec<String>,
}

impl SelectionPolicy {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    /// Pick the first unposted candidate, or `None` when every keyword is exhausted.
    pub async fn select(
        &self,
        source: &dyn CandidateSource,
        posted: &PostedSet,
    ) -> Option<Selection> {
        for keyword in &self.keywords {
            let candidates = source.search(keyword).await;
            if candidates.is_empty() {
                log::info!("No recipes found for '{}'", keyword);
                continue;
            }

            match candidates.into_iter().find(|id| !posted.contains(id)) {
                Some(recipe_id) => {
                    log::info!("Found a new recipe for '{}': {}", keyword, recipe_id);
                    return Some(Selection {
                        keyword: keyword.clone(),
                        recipe_id,
                    });
                }
                None => log::info!("Every recipe for '{}' was already posted", keyword),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeId;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned search results that also records which keywords were queried.
    #[derive(Default)]
    struct CannedSource {
        results: HashMap<String, Vec<RecipeId>>,
        queried: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn with(mut self, keyword: &str, urls: &[&str]) -> Self {
            self.results
                .insert(keyword.to_string(), urls.iter().map(|u| RecipeId::from(*u)).collect());
            self
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CandidateSource for CannedSource {
        async fn search(&self, keyword: &str) -> Vec<RecipeId> {
            self.queried.lock().unwrap().push(keyword.to_string());
            self.results.get(keyword).cloned().unwrap_or_default()
        }
    }

    fn policy() -> SelectionPolicy {
        SelectionPolicy::new(vec!["tảo chile".into(), "sườn non chay".into()])
    }

    #[tokio::test]
    async fn picks_first_candidate_of_first_keyword() {
        let source = CannedSource::default()
            .with("tảo chile", &["U1", "U2"])
            .with("sườn non chay", &["U3"]);

        let selection = policy().select(&source, &PostedSet::new()).await.unwrap();
        assert_eq!(selection.recipe_id, RecipeId::from("U1"));
        assert_eq!(selection.keyword, "tảo chile");
        assert_eq!(source.queried(), vec!["tảo chile"]);
    }

    #[tokio::test]
    async fn skips_posted_candidates() {
        let source = CannedSource::default().with("tảo chile", &["U1", "U2"]);
        let posted: PostedSet = [RecipeId::from("U1")].into_iter().collect();

        let selection = policy().select(&source, &posted).await.unwrap();
        assert_eq!(selection.recipe_id, RecipeId::from("U2"));
    }

    #[tokio::test]
    async fn falls_through_to_next_keyword() {
        let source = CannedSource::default()
            .with("tảo chile", &["U1"])
            .with("sườn non chay", &["U1", "U3"]);
        let posted: PostedSet = [RecipeId::from("U1")].into_iter().collect();

        let selection = policy().select(&source, &posted).await.unwrap();
        assert_eq!(selection.recipe_id, RecipeId::from("U3"));
        assert_eq!(selection.keyword, "sườn non chay");
        assert_eq!(source.queried(), vec!["tảo chile", "sườn non chay"]);
    }

    #[tokio::test]
    async fn exhausted_keywords_yield_none() {
        let source = CannedSource::default().with("tảo chile", &["U1"]);
        let posted: PostedSet = [RecipeId::from("U1")].into_iter().collect();

        assert!(policy().select(&source, &posted).await.is_none());
        assert_eq!(source.queried(), vec!["tảo chile", "sườn non chay"]);
    }

    #[tokio::test]
    async fn selection_is_stable_and_never_posted() {
        let source = CannedSource::default()
            .with("tảo chile", &["U1", "U2", "U3"])
            .with("sườn non chay", &["U4"]);
        let posted: PostedSet = [RecipeId::from("U1"), RecipeId::from("U3")]
            .into_iter()
            .collect();

        let first = policy().select(&source, &posted).await.unwrap();
        let second = policy().select(&source, &posted).await.unwrap();
        assert_eq!(first, second);
        assert!(!posted.contains(&first.recipe_id));
    }
}
