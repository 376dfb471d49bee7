//! OpenAI image generation client.
//!
//! Calls the Images API (`POST /images/generations`) for exactly one
//! 1024x1024 image and returns its hosted URL.

use super::{GeneratedImage, ImageGenerator, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const IMAGE_SIZE: &str = "1024x1024";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

pub struct OpenAiImageGenerator {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiImageGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/images/generations",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let request = ImagesGenerateRequest {
            model: &self.config.image_model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        tracing::debug!(
            model = %self.config.image_model,
            prompt_len = prompt.len(),
            "Sending request to OpenAI Images API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<OpenAiErrorBody>(&body)
                .map(|e| match e.error.kind {
                    Some(kind) => format!("{} ({})", e.error.message, kind),
                    None => e.error.message,
                })
                .unwrap_or(body);
            tracing::error!(status = %status, "OpenAI image generation failed: {}", detail);
            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, detail
            )));
        }

        let parsed: ImagesGenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("no image data returned".to_string()))?;

        let url = first
            .url
            .ok_or_else(|| ProviderError::EmptyResponse("image has no url".to_string()))?;

        Ok(GeneratedImage {
            url,
            revised_prompt: first.revised_prompt,
        })
    }
}
