#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gallery_service::services::providers::mock::{MockAssetHost, MockImageGenerator};
use gallery_service::services::InMemoryGalleryStore;
use gallery_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "http://localhost:5173";
pub const FIXED_IMAGE_URL: &str = "https://images.example/generated/fixed.png";
pub const FIXED_PUBLIC_ID: &str = "ai-art-work/fixed";

/// Router wired to mock providers and an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub generator: Arc<MockImageGenerator>,
    pub asset_host: Arc<MockAssetHost>,
    pub store: Arc<InMemoryGalleryStore>,
}

impl TestApp {
    pub fn new(
        generator: MockImageGenerator,
        asset_host: MockAssetHost,
        store: InMemoryGalleryStore,
    ) -> Self {
        let generator = Arc::new(generator);
        let asset_host = Arc::new(asset_host);
        let store = Arc::new(store);

        let state = AppState {
            image_generator: generator.clone(),
            asset_host: asset_host.clone(),
            store: store.clone(),
        };
        let router = build_router(state, TEST_ORIGIN).expect("Failed to build router");

        Self {
            router,
            generator,
            asset_host,
            store,
        }
    }

    /// Providers return [`FIXED_IMAGE_URL`] and [`FIXED_PUBLIC_ID`].
    pub fn fixed() -> Self {
        Self::new(
            MockImageGenerator::returning(FIXED_IMAGE_URL),
            MockAssetHost::returning(FIXED_PUBLIC_ID),
            InMemoryGalleryStore::new(),
        )
    }

    /// Providers hand out a distinct URL and public id per call.
    pub fn numbered() -> Self {
        Self::new(
            MockImageGenerator::numbered("https://images.example/generated"),
            MockAssetHost::numbered("ai-art-work"),
            InMemoryGalleryStore::new(),
        )
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("Body is not JSON")
        };
        (status, json)
    }

    pub async fn generate(&self, prompt: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/generate-image")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "prompt": prompt }).to_string(),
                ))
                .unwrap(),
        )
        .await
    }

    pub async fn list(&self) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri("/images")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}
