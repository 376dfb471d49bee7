use crate::models::GalleryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub url: String,
}

/// Gallery record as exposed over HTTP.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecordResponse {
    pub id: String,
    pub prompt: String,
    pub url: String,
    pub public_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GalleryRecord> for GalleryRecordResponse {
    fn from(record: GalleryRecord) -> Self {
        Self {
            id: record.id,
            prompt: record.prompt,
            url: record.url,
            public_id: record.public_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Body of every failed generate/list call.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}
