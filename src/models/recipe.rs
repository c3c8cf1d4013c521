//! Recipe data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical URL of a recipe page. Used as the dedup key and the fetch target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecipeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A fully extracted recipe. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,

    /// One ingredient per line, in page order
    pub ingredients: String,

    /// Numbered steps, one per line
    pub steps: String,

    pub image_url: String,
}

/// Fields gathered from the page before validation.
///
/// Markup and structured data are extracted independently and merged here;
/// validity is only decided in [`RecipeDraft::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    pub image_url: String,
}

impl RecipeDraft {
    /// Names of the fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("ingredients", &self.ingredients),
            ("steps", &self.steps),
            ("image_url", &self.image_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Turn the draft into a record, or report which fields are missing.
    pub fn finish(self) -> std::result::Result<RecipeRecord, Vec<&'static str>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(RecipeRecord {
            title: self.title,
            ingredients: self.ingredients,
            steps: self.steps,
            image_url: self.image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Tảo chile xào nấm".to_string(),
            ingredients: "100g tảo chile\n200g nấm".to_string(),
            steps: "1. Rửa tảo\n2. Xào nấm".to_string(),
            image_url: "https://img.example.com/1.jpg".to_string(),
        }
    }

    #[test]
    fn finish_accepts_complete_draft() {
        let record = full_draft().finish().unwrap();
        assert_eq!(record.title, "Tảo chile xào nấm");
        assert_eq!(record.image_url, "https://img.example.com/1.jpg");
    }

    #[test]
    fn finish_rejects_any_empty_field() {
        let mut draft = full_draft();
        draft.image_url.clear();
        assert_eq!(draft.finish().unwrap_err(), vec!["image_url"]);

        let mut draft = full_draft();
        draft.ingredients = " \n ".to_string();
        draft.steps.clear();
        assert_eq!(draft.finish().unwrap_err(), vec!["ingredients", "steps"]);
    }

    #[test]
    fn empty_draft_reports_all_fields() {
        assert_eq!(RecipeDraft::default().missing_fields().len(), 4);
    }

    #[test]
    fn recipe_id_displays_url() {
        let id = RecipeId::new("https://cookpad.com/vn/cong-thuc/1");
        assert_eq!(id.to_string(), "https://cookpad.com/vn/cong-thuc/1");
        assert_eq!(id.as_str(), id.as_ref());
    }
}
