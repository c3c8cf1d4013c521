// src/models/mod.rs

//! Domain models for the bot.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod posted;
mod recipe;

// Re-export all public types
pub use config::{
    ComposeConfig, Config, HttpConfig, PublishConfig, RendererKind, SearchConfig,
    SelectionConfig, StorageConfig,
};
pub use credentials::Credentials;
pub use posted::PostedSet;
pub use recipe::{RecipeDraft, RecipeId, RecipeRecord};

/// The candidate chosen for this run and the keyword that surfaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub keyword: String,
    pub recipe_id: RecipeId,
}

/// Response of a successful publish call.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublishReceipt {
    /// Photo id returned by the page
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub post_id: Option<String>,
}
