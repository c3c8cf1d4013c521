// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fetch a page body, treating non-success statuses as errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}
