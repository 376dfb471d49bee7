//! Application startup and lifecycle management.

use crate::config::GalleryConfig;
use crate::handlers;
use crate::services::providers::cloudinary::CloudinaryAssetHost;
use crate::services::providers::openai::OpenAiImageGenerator;
use crate::services::{AssetHost, GalleryDb, GalleryStore, ImageGenerator};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Client handles are built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub image_generator: Arc<dyn ImageGenerator>,
    pub asset_host: Arc<dyn AssetHost>,
    pub store: Arc<dyn GalleryStore>,
}

/// Build the HTTP router. Cross-origin calls are allowed from `allowed_origin` only.
pub fn build_router(state: AppState, allowed_origin: &str) -> Result<Router, AppError> {
    let origin = allowed_origin.parse::<HeaderValue>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid CORS origin '{}': {}",
            allowed_origin,
            e
        ))
    })?;

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/generate-image", post(handlers::generate_image))
        .route("/images", get(handlers::list_images))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state);

    Ok(router)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect the store, build the provider clients and bind the listener.
    pub async fn build(config: GalleryConfig) -> Result<Self, AppError> {
        let db = GalleryDb::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let image_generator = OpenAiImageGenerator::new(config.openai.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        tracing::info!(
            model = %config.openai.image_model,
            "Initialized OpenAI image generator"
        );

        let asset_host = CloudinaryAssetHost::new(config.cloudinary.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        tracing::info!(
            cloud_name = %config.cloudinary.cloud_name,
            folder = %config.cloudinary.folder,
            "Initialized Cloudinary asset host"
        );

        let state = AppState {
            image_generator: Arc::new(image_generator),
            asset_host: Arc::new(asset_host),
            store: Arc::new(db),
        };

        let router = build_router(state, &config.cors.allowed_origin)?;

        // Port 0 picks a random port (tests).
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gallery service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
