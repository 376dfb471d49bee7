//! External provider abstractions and implementations.
//!
//! Two seams: an [`ImageGenerator`] that turns a prompt into a hosted image,
//! and an [`AssetHost`] that archives a remote image and hands back its
//! identifier. Real clients talk to OpenAI and Cloudinary; the mocks back
//! the tests.

pub mod cloudinary;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::NetworkError(err.to_string())
    }
}

/// Image produced by the generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Provider-hosted location of the image.
    pub url: String,
    /// Prompt as rewritten by the provider, when it rewrites prompts.
    pub revised_prompt: Option<String>,
}

/// Copy of an image stored on the asset host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub public_id: String,
    pub secure_url: String,
}

/// Trait for text-to-image providers (e.g., OpenAI DALL-E).
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a single image for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;
}

/// Trait for remote asset storage (e.g., Cloudinary).
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// Fetch the image at `source_url` into the host's gallery folder.
    async fn upload_from_url(&self, source_url: &str) -> Result<UploadedAsset, ProviderError>;
}
