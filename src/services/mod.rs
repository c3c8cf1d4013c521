//! Service layer for the bot.
//!
//! This module contains the business logic for:
//! - Candidate discovery (`CandidateSearch`) on top of a `PageRenderer`
//! - Recipe extraction (`RecipeExtractor`) from markup and JSON-LD
//! - Choosing what to post (`SelectionPolicy`)
//! - Writing the post (`GeminiComposer`) and publishing it (`FacebookPublisher`)

mod compose;
mod extractor;
mod prompt;
mod publish;
mod renderer;
mod search;
mod selection;
pub mod structured;

pub use compose::{Composer, GeminiComposer};
pub use extractor::{CookpadLayout, MarkupLayout, RecipeExtractor, RecipeSource};
pub use prompt::{POST_PROMPT, build_prompt};
pub use publish::{FacebookPublisher, Publisher};
#[cfg(feature = "browser")]
pub use renderer::ChromeRenderer;
pub use renderer::{HttpRenderer, PageRenderer, build_renderer, contains_match};
pub use search::{CandidateSearch, CandidateSource};
pub use selection::SelectionPolicy;
