//! Terminal states of a pipeline run.

use crate::models::{PublishReceipt, RecipeRecord, Selection};

/// Whether the run publishes or stops after composing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Live,
    /// Compose the post but neither publish nor record it
    DryRun,
}

/// How a run ended. Every path through the pipeline produces one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Posted and recorded
    Published {
        selection: Selection,
        receipt: PublishReceipt,
    },
    /// Dry run finished; nothing was published
    DryRun {
        selection: Selection,
        recipe: RecipeRecord,
        post: String,
    },
    /// Every priority keyword is exhausted
    NothingNew,
    /// The posted set could not be read
    StateUnavailable { reason: String },
    ExtractionFailed { selection: Selection },
    ComposeFailed { selection: Selection, reason: String },
    PublishFailed { selection: Selection, reason: String },
    /// Posted, but appending to the posted set failed. May be re-posted later.
    PublishedNotRecorded { selection: Selection, reason: String },
}

impl RunOutcome {
    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Published { .. } => "published",
            Self::DryRun { .. } => "dry_run",
            Self::NothingNew => "nothing_new",
            Self::StateUnavailable { .. } => "state_unavailable",
            Self::ExtractionFailed { .. } => "extraction_failed",
            Self::ComposeFailed { .. } => "compose_failed",
            Self::PublishFailed { .. } => "publish_failed",
            Self::PublishedNotRecorded { .. } => "published_not_recorded",
        }
    }

    /// `true` for outcomes a scheduler should treat as a clean run.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Published { .. } | Self::DryRun { .. } | Self::NothingNew
        )
    }

    /// The recipe this run worked on, if one was selected.
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Published { selection, .. }
            | Self::DryRun { selection, .. }
            | Self::ExtractionFailed { selection }
            | Self::ComposeFailed { selection, .. }
            | Self::PublishFailed { selection, .. }
            | Self::PublishedNotRecorded { selection, .. } => Some(selection),
            Self::NothingNew | Self::StateUnavailable { .. } => None,
        }
    }

    /// Human-readable reason the run stopped.
    pub fn reason(&self) -> String {
        match self {
            Self::Published { selection, receipt } => format!(
                "Published {} (photo id {})",
                selection.recipe_id,
                if receipt.id.is_empty() { "unknown" } else { &receipt.id }
            ),
            Self::DryRun { selection, .. } => {
                format!("Dry run composed a post for {}", selection.recipe_id)
            }
            Self::NothingNew => "No new recipe found for any priority keyword".to_string(),
            Self::StateUnavailable { reason } => {
                format!("Could not read the posted set: {reason}")
            }
            Self::ExtractionFailed { selection } => format!(
                "Could not extract recipe details from {}",
                selection.recipe_id
            ),
            Self::ComposeFailed { reason, .. } => format!("Could not compose the post: {reason}"),
            Self::PublishFailed { reason, .. } => format!("Publishing failed: {reason}"),
            Self::PublishedNotRecorded { selection, reason } => format!(
                "Published {} but could not record it: {reason}",
                selection.recipe_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeId;

    fn selection() -> Selection {
        Selection {
            keyword: "tảo chile".to_string(),
            recipe_id: RecipeId::from("https://cookpad.com/vn/cong-thuc/1"),
        }
    }

    #[test]
    fn success_classification() {
        assert!(RunOutcome::NothingNew.is_success());
        assert!(
            !RunOutcome::ExtractionFailed {
                selection: selection()
            }
            .is_success()
        );
        assert!(
            !RunOutcome::PublishedNotRecorded {
                selection: selection(),
                reason: "disk full".to_string()
            }
            .is_success()
        );
    }

    #[test]
    fn reasons_are_distinct() {
        let outcomes = [
            RunOutcome::NothingNew,
            RunOutcome::StateUnavailable {
                reason: "x".to_string(),
            },
            RunOutcome::ExtractionFailed {
                selection: selection(),
            },
            RunOutcome::ComposeFailed {
                selection: selection(),
                reason: "x".to_string(),
            },
            RunOutcome::PublishFailed {
                selection: selection(),
                reason: "x".to_string(),
            },
        ];
        let reasons: std::collections::HashSet<_> =
            outcomes.iter().map(RunOutcome::reason).collect();
        assert_eq!(reasons.len(), outcomes.len());
    }
}
