//! Embedded structured recipe metadata (JSON-LD).
//!
//! Recipe pages carry one or more `<script type="application/ld+json">`
//! blocks. The first block describing a `Recipe` supplies the steps and the
//! image. Blocks that are not valid JSON are skipped.

use scraper::Html;
use serde_json::Value;

use crate::error::Result;
use crate::utils::parse_selector;

const JSON_LD_SELECTOR: &str = "script[type='application/ld+json']";

/// Steps and image read from the Recipe block. Empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    pub steps: String,
    pub image_url: String,
}

/// Read steps and image from the first Recipe block on the page.
pub fn structured_fields(document: &Html) -> Result<StructuredFields> {
    let Some(recipe) = find_recipe_block(document)? else {
        log::warn!("No JSON-LD Recipe block found; steps and image are unavailable");
        return Ok(StructuredFields::default());
    };

    Ok(StructuredFields {
        steps: steps_text(&recipe),
        image_url: image_url(&recipe),
    })
}

/// Find the first JSON-LD object whose `@type` is `Recipe`.
pub fn find_recipe_block(document: &Html) -> Result<Option<Value>> {
    let selector = parse_selector(JSON_LD_SELECTOR)?;

    for script in document.select(&selector) {
        let text: String = script.text().collect();
        let json: Value = match serde_json::from_str(text.trim()) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        if let Some(recipe) = recipe_in(&json) {
            return Ok(Some(recipe.clone()));
        }
    }
    Ok(None)
}

/// Look for a Recipe at the top level, in a top-level array, or in `@graph`.
fn recipe_in(json: &Value) -> Option<&Value> {
    if is_recipe(json) {
        return Some(json);
    }
    let items = match json {
        Value::Array(items) => items,
        Value::Object(obj) => obj.get("@graph")?.as_array()?,
        _ => return None,
    };
    items.iter().find(|item| is_recipe(item))
}

fn is_recipe(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t == "Recipe"),
        _ => false,
    }
}

/// Numbered steps, one per line, in listed order.
pub fn steps_text(recipe: &Value) -> String {
    match recipe.get("recipeInstructions") {
        Some(Value::Array(steps)) => steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step_text(step)))
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::String(s)) if !s.trim().is_empty() => format!("1. {}", s.trim()),
        _ => String::new(),
    }
}

fn step_text(step: &Value) -> &str {
    match step {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str).unwrap_or(""),
        _ => "",
    }
}

/// Image URL: a string, the first entry of a list, or an ImageObject's `url`.
pub fn image_url(recipe: &Value) -> String {
    fn from_entry(entry: &Value) -> Option<&str> {
        match entry {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("url").and_then(Value::as_str),
            _ => None,
        }
    }

    let url = match recipe.get("image") {
        Some(Value::Array(entries)) => entries.first().and_then(from_entry),
        Some(entry) => from_entry(entry),
        None => None,
    };
    url.unwrap_or("").trim().to_string()
}
