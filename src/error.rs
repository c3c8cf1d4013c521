// src/error.rs

//! Unified error handling for the bot.

use std::fmt;

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page could not be loaded or rendered
    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    /// Text-compose service failed
    #[error("Compose error: {0}")]
    Compose(String),

    /// Publish service rejected the post
    #[error("Publish error (status {status}): {payload}")]
    Publish { status: u16, payload: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a render error with the page URL as context.
    pub fn render(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Render {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a compose error.
    pub fn compose(message: impl fmt::Display) -> Self {
        Self::Compose(message.to_string())
    }

    /// Create a publish error carrying the raw response payload.
    pub fn publish(status: u16, payload: impl Into<String>) -> Self {
        Self::Publish {
            status,
            payload: payload.into(),
        }
    }
}
