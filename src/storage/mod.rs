//! Storage abstractions for the posted set.
//!
//! The posted set is the only state that outlives a run. It is append-only:
//! entries are never removed or rewritten.
//!
//! ## File Format
//!
//! ```text
//! posted_recipes.txt
//! https://cookpad.com/vn/cong-thuc/111
//! https://cookpad.com/vn/cong-thuc/222
//! ```
//!
//! One identifier per line, no header.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PostedSet, RecipeId};

// Re-export for convenience
pub use local::LocalPostedStore;

/// Trait for posted-set storage backends.
#[async_trait]
pub trait PostedStore: Send + Sync {
    /// Load every recorded identifier.
    ///
    /// Missing storage is a valid initial state and yields an empty set.
    async fn load(&self) -> Result<PostedSet>;

    /// Durably record one identifier.
    ///
    /// No dedup check is done here; callers only append ids that were not
    /// in the set they loaded.
    async fn append(&self, id: &RecipeId) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
