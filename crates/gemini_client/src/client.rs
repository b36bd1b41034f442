use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use log::{error, info, warn};
use reqwest::Client;
use uuid::Uuid;

use crate::client_trait::{GeneratedImage, ImageModelClient};
use crate::error::GeminiError;
use crate::extract::{find_image_part, flatten_chunk};
use crate::protocol::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Bounds the whole call, connect through last streamed byte.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        GeminiConfig {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Live client for the Gemini image-generation API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeminiError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(GeminiClient { http, config })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ImageModelClient for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GeminiError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        info!(
            "Requesting image from model '{}' (prompt length: {} chars)",
            self.config.model,
            prompt.len()
        );

        let response = self
            .http
            .post(self.stream_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            error!("Gemini API returned {}: {}", status, message);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Scan streamed chunks in order; the first non-empty inline image
        // part is the result and the rest of the stream is dropped.
        let mut event_stream = response.bytes_stream().eventsource();
        let mut image: Option<(String, String)> = None;
        while let Some(event_result) = event_stream.next().await {
            let event = event_result
                .map_err(|e| GeminiError::Transport(format!("Error in SSE stream: {e}")))?;
            let chunk = match serde_json::from_str::<GenerateContentResponse>(&event.data) {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Failed to parse stream chunk: {}, data: {}", e, event.data);
                    continue;
                }
            };
            if let Some(found) = find_image_part(flatten_chunk(chunk)) {
                image = Some(found);
                break;
            }
        }

        let (mime_type, encoded) = image.ok_or(GeminiError::NoImage)?;
        let data = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| GeminiError::InvalidPayload(format!("base64 decode failed: {e}")))?;

        let image_id = Uuid::new_v4().to_string();
        info!(
            "Received {} byte {} image (id: {})",
            data.len(),
            mime_type,
            image_id
        );

        Ok(GeneratedImage {
            data,
            mime_type,
            image_id,
        })
    }
}
