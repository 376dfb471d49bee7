use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub openai: OpenAiConfig,
    pub cloudinary: CloudinaryConfig,
    pub cors: CorsConfig,
    /// OTLP collector for trace export; logs only when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    /// Image model, e.g. dall-e-3
    pub image_model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// Folder every generated image is archived under.
    pub folder: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl GalleryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GalleryConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(get_env_or(&["MONGODB_URI", "MONGO_URL"], is_prod)?),
                database: get_env("MONGODB_DATABASE", Some("gallery_db"), is_prod)?,
            },
            openai: OpenAiConfig {
                api_key: Secret::new(get_env("OPENAI_API_KEY", None, is_prod)?),
                image_model: get_env("OPENAI_IMAGE_MODEL", Some("dall-e-3"), is_prod)?,
                api_base: get_env(
                    "OPENAI_API_BASE",
                    Some("https://api.openai.com/v1"),
                    is_prod,
                )?,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: get_env("CLOUDINARY_CLOUD_NAME", None, is_prod)?,
                api_key: get_env("CLOUDINARY_API_KEY", None, is_prod)?,
                api_secret: Secret::new(get_env("CLOUDINARY_API_SECRET", None, is_prod)?),
                folder: get_env("CLOUDINARY_FOLDER", Some("ai-art-work"), is_prod)?,
                api_base: get_env(
                    "CLOUDINARY_API_BASE",
                    Some("https://api.cloudinary.com/v1_1"),
                    is_prod,
                )?,
            },
            cors: CorsConfig {
                allowed_origin: get_env(
                    "CORS_ALLOWED_ORIGIN",
                    Some("http://localhost:5173"),
                    is_prod,
                )?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// First of `keys` that is set; required, with no default.
fn get_env_or(keys: &[&str], is_prod: bool) -> Result<String, AppError> {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .map_or_else(
            || {
                let first = keys.first().copied().unwrap_or_default();
                get_env(first, None, is_prod)
            },
            Ok,
        )
}
