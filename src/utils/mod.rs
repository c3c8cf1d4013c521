//! Utility functions and helpers.

pub mod banner;
pub mod http;

use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Parse a CSS selector, mapping failures to [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Percent-encode `s` so it stays a single URL path segment.
///
/// `/`, `%`, `?` and `#` are escaped along with spaces and non-ASCII.
pub fn encode_path_segment(s: &str) -> Result<String> {
    let mut scratch = Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|_| AppError::validation("scratch URL cannot hold path segments"))?
        .pop_if_empty()
        .push(s);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

/// Collapse text nodes the way a "strip" text getter does: trim each piece
/// and concatenate the non-empty ones.
pub fn stripped_text<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces.map(str::trim).filter(|s| !s.is_empty()).collect()
}
