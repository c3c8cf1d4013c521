//! Publishing to a Facebook page.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{PublishConfig, PublishReceipt};

/// Publishes a captioned image.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, caption: &str, image_url: &str) -> Result<PublishReceipt>;
}

/// Graph API photo upload to a page.
pub struct FacebookPublisher {
    client: reqwest::Client,
    config: PublishConfig,
    page_id: String,
    access_token: String,
}

impl FacebookPublisher {
    pub fn new(
        client: reqwest::Client,
        config: PublishConfig,
        page_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            config,
            page_id: page_id.into(),
            access_token: access_token.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/photos",
            self.config.graph_api_base.trim_end_matches('/'),
            self.page_id
        )
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    async fn publish(&self, caption: &str, image_url: &str) -> Result<PublishReceipt> {
        log::info!("Publishing to page {}...", self.page_id);

        let form = [
            ("url", image_url),
            ("caption", caption),
            ("access_token", self.access_token.as_str()),
        ];
        let response = self.client.post(self.endpoint()).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        log::info!("Page response: {}", body);

        if !status.is_success() {
            return Err(AppError::publish(status.as_u16(), body));
        }

        // The photo is live at this point; a body we cannot read must not turn
        // it into a failure.
        let receipt = serde_json::from_str(&body).unwrap_or_else(|e| {
            log::warn!("Could not read publish receipt: {}", e);
            PublishReceipt::default()
        });
        Ok(receipt)
    }
}
