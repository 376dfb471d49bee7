//! Gallery persistence.
//!
//! [`GalleryStore`] is the seam the handlers write through; [`GalleryDb`] is
//! the MongoDB implementation used in production.

use crate::models::GalleryRecord;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const GALLERY_COLLECTION: &str = "galleries";

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Append a record. Never overwrites.
    async fn insert(&self, record: &GalleryRecord) -> Result<(), AppError>;

    /// Every record, in whatever order the store returns them.
    async fn list(&self) -> Result<Vec<GalleryRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct GalleryDb {
    client: MongoClient,
    db: Database,
}

impl GalleryDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for gallery-service");

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.galleries()
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn galleries(&self) -> Collection<GalleryRecord> {
        self.db.collection(GALLERY_COLLECTION)
    }
}

#[async_trait]
impl GalleryStore for GalleryDb {
    async fn insert(&self, record: &GalleryRecord) -> Result<(), AppError> {
        self.galleries()
            .insert_one(record, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert gallery record: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GalleryRecord>, AppError> {
        let cursor = self.galleries().find(None, None).await.map_err(|e| {
            tracing::error!("Failed to query gallery records: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect gallery records: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }
}
