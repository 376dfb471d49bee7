use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One generated image: the prompt it came from, where the provider put it,
/// and the asset host's identifier for the archived copy.
///
/// Records are append-only; nothing in the service updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub prompt: String,
    pub url: String,
    pub public_id: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl GalleryRecord {
    pub fn new(prompt: String, url: String, public_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            prompt,
            url,
            public_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};

    #[test]
    fn new_record_has_matching_timestamps() {
        let record = GalleryRecord::new(
            "a lighthouse at dusk".to_string(),
            "https://images.example/1.png".to_string(),
            "ai-art-work/abc".to_string(),
        );
        assert_eq!(record.created_at, record.updated_at);
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn stored_document_uses_bson_dates_and_snake_case() {
        let record = GalleryRecord::new(
            "p".to_string(),
            "https://images.example/1.png".to_string(),
            "ai-art-work/abc".to_string(),
        );
        let doc = bson::to_document(&record).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), record.id);
        assert_eq!(doc.get_str("public_id").unwrap(), "ai-art-work/abc");
        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));
        assert!(matches!(doc.get("updated_at"), Some(Bson::DateTime(_))));
    }
}
