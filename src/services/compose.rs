//! Post composition through Gemini.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ComposeConfig, RecipeRecord};
use crate::services::prompt::build_prompt;

/// Turns a recipe into post text.
#[async_trait]
pub trait Composer: Send + Sync {
    async fn compose(&self, recipe: &RecipeRecord) -> Result<String>;
}

/// Gemini `generateContent` client.
pub struct GeminiComposer {
    client: reqwest::Client,
    config: ComposeConfig,
    api_key: String,
}

impl GeminiComposer {
    pub fn new(client: reqwest::Client, config: ComposeConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            config,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Gemini request format.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Gemini response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Error response from Gemini.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[async_trait]
impl Composer for GeminiComposer {
    async fn compose(&self, recipe: &RecipeRecord) -> Result<String> {
        log::info!("Asking {} to write the post...", self.config.model);

        let prompt = build_prompt(recipe, &self.config.page_name, &self.config.share_link);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(AppError::compose)?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::compose)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AppError::compose(format!("status {}: {}", status.as_u16(), message)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::compose(format!("unreadable response: {e}")))?;
        let text = parsed.text();
        if text.is_empty() {
            return Err(AppError::compose(format!("empty response: {body}")));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_async_client;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn recipe() -> RecipeRecord {
        RecipeRecord {
            title: "Nấm lộc nhung xào".to_string(),
            ingredients: "200g nấm lộc nhung".to_string(),
            steps: "1. Xào nấm".to_string(),
            image_url: "https://img/n.jpg".to_string(),
        }
    }

    fn composer(server: &MockServer) -> GeminiComposer {
        let config = ComposeConfig {
            api_base: server.uri(),
            ..ComposeConfig::default()
        };
        let client = create_async_client(&HttpConfig::default()).unwrap();
        GeminiComposer::new(client, config, "test-key")
    }

    #[tokio::test]
    async fn compose_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_string_contains("Nấm lộc nhung xào"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "  [CHUYÊN MỤC] "}, {"text": "Chào cả nhà!  "}]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = composer(&server).compose(&recipe()).await.unwrap();
        assert_eq!(text, "[CHUYÊN MỤC] Chào cả nhà!");
    }

    #[tokio::test]
    async fn compose_reports_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": 403, "message": "API key not valid"}
            })))
            .mount(&server)
            .await;

        let err = composer(&server).compose(&recipe()).await.unwrap_err();
        assert!(matches!(err, AppError::Compose(_)));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn compose_rejects_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = composer(&server).compose(&recipe()).await.unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }
}
