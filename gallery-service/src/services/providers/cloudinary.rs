//! Cloudinary asset host client.
//!
//! Uses the signed Upload API with a remote `file` URL, so the image is
//! fetched by Cloudinary directly and never passes through this service.

use super::{AssetHost, ProviderError, UploadedAsset};
use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorDetail,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorDetail {
    message: String,
}

pub struct CloudinaryAssetHost {
    config: CloudinaryConfig,
    client: Client,
}

impl CloudinaryAssetHost {
    pub fn new(config: CloudinaryConfig) -> Result<Self, ProviderError> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Cloudinary cloud name and API key must be set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// Signature for a Cloudinary API call.
///
/// Parameters are sorted by name, joined as `k=v` pairs with `&`, suffixed
/// with the API secret and hashed with SHA-256 (lowercase hex).
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AssetHost for CloudinaryAssetHost {
    async fn upload_from_url(&self, source_url: &str) -> Result<UploadedAsset, ProviderError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            self.config.api_secret.expose_secret(),
        );

        let form = [
            ("file", source_url),
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature_algorithm", "sha256"),
            ("signature", signature.as_str()),
        ];

        tracing::debug!(folder = %self.config.folder, "Uploading image to Cloudinary");

        let response = self.client.post(self.upload_url()).form(&form).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<CloudinaryErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::error!(status = %status, "Cloudinary upload failed: {}", detail);
            return Err(ProviderError::ApiError(format!(
                "Cloudinary error {}: {}",
                status, detail
            )));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        tracing::info!(public_id = %uploaded.public_id, "Image archived on Cloudinary");

        Ok(UploadedAsset {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_independent() {
        let a = sign_params(&[("timestamp", "1700000000"), ("folder", "art")], "s3cr3t");
        let b = sign_params(&[("folder", "art"), ("timestamp", "1700000000")], "s3cr3t");
        assert_eq!(a, b);
    }

    #[test]
    fn signature_matches_sha256_of_sorted_params() {
        let expected = hex::encode(Sha256::digest(
            b"folder=ai-art-work&timestamp=1315060510abcd",
        ));
        let actual = sign_params(
            &[("timestamp", "1315060510"), ("folder", "ai-art-work")],
            "abcd",
        );
        assert_eq!(actual, expected);
        assert_eq!(actual.len(), 64);
    }

    #[test]
    fn rejects_missing_credentials() {
        let config = CloudinaryConfig {
            cloud_name: String::new(),
            api_key: "key".to_string(),
            api_secret: secrecy::Secret::new("secret".to_string()),
            folder: "ai-art-work".to_string(),
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
        };
        assert!(matches!(
            CloudinaryAssetHost::new(config),
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
