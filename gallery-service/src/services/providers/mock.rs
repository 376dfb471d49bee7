//! Mock provider implementations for testing.

use super::{AssetHost, GeneratedImage, ImageGenerator, ProviderError, UploadedAsset};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum ImageOutcome {
    Fixed(String),
    Numbered(String),
    Fail(String),
}

/// Mock image generator.
pub struct MockImageGenerator {
    outcome: ImageOutcome,
    revised_prompt: Option<String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockImageGenerator {
    fn with_outcome(outcome: ImageOutcome) -> Self {
        Self {
            outcome,
            revised_prompt: None,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always returns `url`.
    pub fn returning(url: impl Into<String>) -> Self {
        Self::with_outcome(ImageOutcome::Fixed(url.into()))
    }

    /// Returns `{base}/image-{n}.png`, `n` counting calls from 1.
    pub fn numbered(base: impl Into<String>) -> Self {
        Self::with_outcome(ImageOutcome::Numbered(base.into()))
    }

    /// Every call fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(ImageOutcome::Fail(message.into()))
    }

    pub fn with_revised_prompt(mut self, revised: impl Into<String>) -> Self {
        self.revised_prompt = Some(revised.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        // Simulate network latency
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let url = match &self.outcome {
            ImageOutcome::Fixed(url) => url.clone(),
            ImageOutcome::Numbered(base) => format!("{}/image-{}.png", base, n),
            ImageOutcome::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
        };

        Ok(GeneratedImage {
            url,
            revised_prompt: self.revised_prompt.clone(),
        })
    }
}

enum AssetOutcome {
    Fixed(String),
    Numbered(String),
    Fail(String),
}

/// Mock asset host.
pub struct MockAssetHost {
    outcome: AssetOutcome,
    uploads: Mutex<Vec<String>>,
}

impl MockAssetHost {
    fn with_outcome(outcome: AssetOutcome) -> Self {
        Self {
            outcome,
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Always assigns `public_id`.
    pub fn returning(public_id: impl Into<String>) -> Self {
        Self::with_outcome(AssetOutcome::Fixed(public_id.into()))
    }

    /// Assigns `{folder}/asset-{n}`, `n` counting uploads from 1.
    pub fn numbered(folder: impl Into<String>) -> Self {
        Self::with_outcome(AssetOutcome::Numbered(folder.into()))
    }

    /// Every upload fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(AssetOutcome::Fail(message.into()))
    }

    /// Source URLs received so far, in call order.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssetHost for MockAssetHost {
    async fn upload_from_url(&self, source_url: &str) -> Result<UploadedAsset, ProviderError> {
        let n = match self.uploads.lock() {
            Ok(mut uploads) => {
                uploads.push(source_url.to_string());
                uploads.len()
            }
            Err(_) => 0,
        };

        let public_id = match &self.outcome {
            AssetOutcome::Fixed(id) => id.clone(),
            AssetOutcome::Numbered(folder) => format!("{}/asset-{}", folder, n),
            AssetOutcome::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
        };

        Ok(UploadedAsset {
            secure_url: format!("https://assets.mock/{}.png", public_id),
            public_id,
        })
    }
}
