//! In-process gallery store for tests and local runs without MongoDB.

use super::database::GalleryStore;
use crate::models::GalleryRecord;
use async_trait::async_trait;
use service_core::error::AppError;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryGalleryStore {
    records: RwLock<Vec<GalleryRecord>>,
    fail_with: Option<String>,
}

impl InMemoryGalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check(&self) -> Result<(), AppError> {
        match &self.fail_with {
            Some(message) => Err(AppError::DatabaseError(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GalleryStore for InMemoryGalleryStore {
    async fn insert(&self, record: &GalleryRecord) -> Result<(), AppError> {
        self.check()?;
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GalleryRecord>, AppError> {
        self.check()?;
        Ok(self.records.read().await.clone())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check()
    }
}
